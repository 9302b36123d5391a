//! Descriptive statistics over gap samples in milliseconds.
//!
//! Every function returns `None` for an empty sample instead of a sentinel,
//! so "no data" never averages into a later aggregate.

/// Arithmetic mean.
pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    Some(sum / values.len() as f64)
}

/// Median; the mean of the two middle values for an even-sized sample.
pub fn median(values: &[i64]) -> Option<f64> {
    let sorted = sorted_copy(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2] as f64)
    } else {
        Some((sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0)
    }
}

/// Percentile `q` in `[0, 1]` using linear interpolation between order
/// statistics at position `q * (n - 1)`.
pub fn percentile(values: &[i64], q: f64) -> Option<f64> {
    let sorted = sorted_copy(values);
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Some(low + (position - lower as f64) * (high - low))
}

/// Fraction of values matching `predicate`, in `[0, 1]`.
pub fn fraction_where(values: &[i64], predicate: impl Fn(i64) -> bool) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let hits = values.iter().filter(|&&v| predicate(v)).count();
    Some(hits as f64 / values.len() as f64)
}

fn sorted_copy(values: &[i64]) -> Vec<i64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted
}
