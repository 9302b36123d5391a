use super::gap_statistics;
use super::turn::Turn;

pub const TAIL_PERCENTILE: f64 = 0.95;

/// Turn-taking latency statistics for one file.
///
/// Gap statistics cover only speaker-change boundaries. Each one is `None`
/// when there is nothing to measure, which is distinct from a measured zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FileSummary {
    pub file_id: String,
    pub turns: usize,
    pub speaker_changes: usize,
    pub avg_gap_ms: Option<f64>,
    pub median_gap_ms: Option<f64>,
    pub p95_gap_ms: Option<f64>,
    /// Fraction of speaker-change gaps that are negative, in `[0, 1]`.
    pub overlap_rate: Option<f64>,
    /// Mean of strictly positive speaker-change gaps.
    pub avg_positive_gap_ms: Option<f64>,
}

impl FileSummary {
    pub fn has_gap_statistics(&self) -> bool {
        self.speaker_changes > 0
    }
}

/// Aggregates one file's turns into a [`FileSummary`].
///
/// A zero gap is a non-overlap: it counts in the overlap-rate denominator
/// but is left out of `avg_positive_gap_ms`.
pub fn summarize(file_id: &str, turns: &[Turn]) -> FileSummary {
    let change_gaps: Vec<i64> = turns.iter().filter_map(Turn::change_gap_ms).collect();
    let positive_gaps: Vec<i64> = change_gaps.iter().copied().filter(|&g| g > 0).collect();

    FileSummary {
        file_id: file_id.to_string(),
        turns: turns.len(),
        speaker_changes: change_gaps.len(),
        avg_gap_ms: gap_statistics::mean(&change_gaps),
        median_gap_ms: gap_statistics::median(&change_gaps),
        p95_gap_ms: gap_statistics::percentile(&change_gaps, TAIL_PERCENTILE),
        overlap_rate: gap_statistics::fraction_where(&change_gaps, |g| g < 0),
        avg_positive_gap_ms: gap_statistics::mean(&positive_gaps),
    }
}
