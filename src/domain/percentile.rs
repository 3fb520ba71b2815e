/// Nearest-rank percentile over an unsorted sample.
///
/// Sorts a copy, picks index `floor(len * pct / 100)` clamped to the last
/// element. Empty input yields 0; `pct` is clamped to `[0, 100]`.
pub fn percentile(samples: &[i64], pct: f64) -> i64 {
    if samples.is_empty() {
        return 0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    sorted[rank_index(sorted.len(), pct)]
}

fn rank_index(len: usize, pct: f64) -> usize {
    let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    let idx = (len as f64 * pct / 100.0).floor() as usize;
    idx.min(len - 1)
}

/// Linearly interpolated percentile over an already sorted slice
pub fn percentile_interpolated(sorted: &[i64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    let pos = (sorted.len() - 1) as f64 * pct / 100.0;
    let lower = pos.floor() as usize;
    let upper = lower + 1;
    if upper >= sorted.len() {
        return sorted[sorted.len() - 1] as f64;
    }

    let weight = pos - lower as f64;
    sorted[lower] as f64 * (1.0 - weight) + sorted[upper] as f64 * weight
}

/// Interpolated values for several percentiles, sorting once
pub fn percentiles_interpolated(samples: &[i64], pcts: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    pcts.iter().map(|&p| percentile_interpolated(&sorted, p)).collect()
}
