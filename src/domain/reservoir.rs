use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed-memory uniform sample over an unbounded stream of observations.
///
/// Once more than `capacity` values have been offered, every value in the
/// stream is present with probability `capacity / count()` (Algorithm R).
/// Running totals (sum, non-zero count) are exact over the whole stream.
#[derive(Clone, Debug)]
pub struct ReservoirSampler {
    capacity: usize,
    samples: Vec<i64>,
    seen: u64,
    sum: i128,
    non_zero: u64,
    rng: StdRng,
}

impl ReservoirSampler {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    /// Reproducible sampler for tests and replays
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            capacity,
            samples: Vec::with_capacity(capacity),
            seen: 0,
            sum: 0,
            non_zero: 0,
            rng,
        }
    }

    pub fn add(&mut self, value: i64) {
        self.seen += 1;
        self.sum += i128::from(value);
        if value != 0 {
            self.non_zero += 1;
        }

        if self.samples.len() < self.capacity {
            self.samples.push(value);
            return;
        }

        // capacity == 0 lands here too and never stores anything
        let j = self.rng.random_range(0..self.seen);
        if j < self.capacity as u64 {
            self.samples[j as usize] = value;
        }
    }

    /// Current sample set. Order carries no meaning.
    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    /// Total observations offered, retained or not
    pub fn count(&self) -> u64 {
        self.seen
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// True running mean of every value ever offered
    pub fn average(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        self.sum as f64 / self.seen as f64
    }

    /// Percentage of observations that were non-zero
    pub fn utilization(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        self.non_zero as f64 / self.seen as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::percentile::percentile;

    #[test]
    fn underfilled_keeps_stream_in_order() {
        let mut sampler = ReservoirSampler::with_seed(10, 7);
        for v in [3, 0, -1, 8, 8] {
            sampler.add(v);
        }

        assert_eq!(sampler.samples(), &[3, 0, -1, 8, 8]);
        assert_eq!(sampler.count(), 5);
        assert!(!sampler.is_full());
    }

    #[test]
    fn exactly_full_keeps_every_value() {
        let mut sampler = ReservoirSampler::with_seed(4, 1);
        for v in 1..=4 {
            sampler.add(v);
        }

        assert_eq!(sampler.samples(), &[1, 2, 3, 4]);
        assert!(sampler.is_full());
    }

    #[test]
    fn overfilled_stays_at_capacity() {
        let mut sampler = ReservoirSampler::with_seed(100, 42);
        for n in 1..=5_000i64 {
            sampler.add(n);
            assert_eq!(sampler.len() as u64, (n as u64).min(100));
        }

        assert_eq!(sampler.len(), 100);
        assert_eq!(sampler.count(), 5_000);
        assert!(sampler.samples().iter().all(|v| (1..=5_000).contains(v)));
    }

    #[test]
    fn zero_capacity_only_counts() {
        let mut sampler = ReservoirSampler::with_seed(0, 3);
        for v in 0..50 {
            sampler.add(v);
        }

        assert!(sampler.is_empty());
        assert_eq!(sampler.count(), 50);
    }

    #[test]
    fn samples_view_is_stable_without_add() {
        let mut sampler = ReservoirSampler::with_seed(8, 11);
        for v in 0..100 {
            sampler.add(v);
        }

        let first = sampler.samples().to_vec();
        let second = sampler.samples().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn same_seed_same_sample() {
        let mut a = ReservoirSampler::with_seed(16, 99);
        let mut b = ReservoirSampler::with_seed(16, 99);
        for v in 0..1_000 {
            a.add(v);
            b.add(v);
        }

        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn running_totals_cover_whole_stream() {
        let mut sampler = ReservoirSampler::with_seed(2, 5);
        for v in [0, 4, 0, 8] {
            sampler.add(v);
        }

        assert_eq!(sampler.average(), 3.0);
        assert_eq!(sampler.utilization(), 50.0);
        assert_eq!(ReservoirSampler::with_seed(2, 5).average(), 0.0);
    }

    #[test]
    fn each_position_equally_likely() {
        // capacity 1 over a 10-item stream: each item should win ~10% of runs
        let runs = 20_000;
        let mut wins = [0usize; 10];
        for seed in 0..runs {
            let mut sampler = ReservoirSampler::with_seed(1, seed as u64);
            for v in 0..10 {
                sampler.add(v);
            }
            wins[sampler.samples()[0] as usize] += 1;
        }

        let expected = runs / 10;
        for (item, &count) in wins.iter().enumerate() {
            let deviation = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.1, "item {} won {} times (expected ~{})", item, count, expected);
        }
    }

    #[test]
    fn reservoir_p90_tracks_stream_p90() {
        // Uniform values in 0..1000 so the true P90 is ~900
        for trial in 0..5u64 {
            let mut source = StdRng::seed_from_u64(1_000 + trial);
            let mut sampler = ReservoirSampler::with_seed(10_000, trial);
            let mut stream = Vec::with_capacity(200_000);
            for _ in 0..200_000 {
                let v = source.random_range(0..1_000i64);
                stream.push(v);
                sampler.add(v);
            }

            let truth = percentile(&stream, 90.0) as f64;
            let estimate = percentile(sampler.samples(), 90.0) as f64;
            let error = (estimate - truth).abs() / truth;
            assert!(error < 0.05, "trial {}: estimate {} vs true {}", trial, estimate, truth);
        }
    }
}
