use std::time::Instant;

/// Tracks observed sampling throughput between frames
#[derive(Clone, Debug, Default)]
pub struct RateTracker {
    last_count: u64,
    last_update: Option<Instant>,
    per_sec: f64,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cumulative count seen at `now` and return the current rate
    pub fn update(&mut self, count: u64, now: Instant) -> f64 {
        if let Some(last) = self.last_update {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            if elapsed > 0.0 {
                self.per_sec = count.saturating_sub(self.last_count) as f64 / elapsed;
            }
        }
        self.last_count = count;
        self.last_update = Some(now);
        self.per_sec
    }

    pub fn per_sec(&self) -> f64 {
        self.per_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_update_has_no_rate() {
        let mut rate = RateTracker::new();
        assert_eq!(rate.update(100, Instant::now()), 0.0);
    }

    #[test]
    fn rate_from_count_delta() {
        let mut rate = RateTracker::new();
        let start = Instant::now();
        rate.update(10, start);
        let per_sec = rate.update(30, start + Duration::from_secs(2));
        assert_eq!(per_sec, 10.0);
        assert_eq!(rate.per_sec(), 10.0);
    }

    #[test]
    fn same_instant_keeps_previous_rate() {
        let mut rate = RateTracker::new();
        let start = Instant::now();
        rate.update(0, start);
        rate.update(5, start + Duration::from_secs(1));
        assert_eq!(rate.update(50, start + Duration::from_secs(1)), 5.0);
    }
}
