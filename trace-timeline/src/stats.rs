//! Occurrence spacing statistics
//!
//! Summarises the time between consecutive occurrences: the input
//! timestamps are sorted, differenced, and the differences (in seconds) are
//! reduced to count, min, max, mean and population standard deviation.

use crate::types::Timestamp;

/// Summary of consecutive-occurrence spacing, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingSummary {
    /// Number of differences (one less than the number of occurrences)
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl SpacingSummary {
    /// Occurrences the summary was computed from
    pub fn occurrences(&self) -> usize {
        self.count + 1
    }
}

/// Result of a spacing analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingStats {
    Summary(SpacingSummary),
    /// Fewer than two occurrences, so there is no spacing to describe
    InsufficientData { occurrences: usize },
}

impl SpacingStats {
    /// Compute spacing statistics over `timestamps` (any order)
    pub fn from_timestamps(timestamps: &[Timestamp]) -> Self {
        if timestamps.len() < 2 {
            return SpacingStats::InsufficientData {
                occurrences: timestamps.len(),
            };
        }

        let mut sorted = timestamps.to_vec();
        sorted.sort_unstable();

        let differences: Vec<f64> = sorted
            .windows(2)
            .map(|pair| pair[1].micros_since(pair[0]) as f64 / 1e6)
            .collect();

        let count = differences.len();
        let min = differences.iter().copied().fold(f64::INFINITY, f64::min);
        let max = differences.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = differences.iter().sum::<f64>() / count as f64;
        let variance = differences
            .iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        SpacingStats::Summary(SpacingSummary {
            count,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn summary(&self) -> Option<&SpacingSummary> {
        match self {
            SpacingStats::Summary(summary) => Some(summary),
            SpacingStats::InsufficientData { .. } => None,
        }
    }
}
