//! Batch report built once every pair has finished.

use super::types::{PairFailure, ScoredPair};
use crate::events::BatchSummary;
use serde::Serialize;

/// Read-only summary of a finished batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Pairs requested
    pub total: usize,
    /// Pairs scored successfully
    pub successful: usize,
    /// Mean similarity over successful pairs
    pub average: Option<f64>,
    /// Lowest similarity among successful pairs
    pub min: Option<f64>,
    /// Highest similarity among successful pairs
    pub max: Option<f64>,
    /// One message per failed pair, ordered by pair index
    pub errors: Vec<String>,
    /// Resize notes, ordered by pair index
    pub notes: Vec<String>,
    /// Scored pairs, ordered by pair index
    pub pairs: Vec<ScoredPair>,
    /// Failed pairs, ordered by pair index
    pub failures: Vec<PairFailure>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Coarse outcome of a batch, for headline messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The batch was empty
    NoPairs,
    /// Pairs were requested but none scored
    NoSuccess { total: usize },
    /// At least one pair scored
    Completed { successful: usize, total: usize },
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::NoPairs => write!(f, "no pairs requested"),
            BatchStatus::NoSuccess { total } => {
                write!(f, "no successful comparisons (0/{} succeeded)", total)
            }
            BatchStatus::Completed { successful, total } => {
                write!(f, "{}/{} succeeded", successful, total)
            }
        }
    }
}

impl BatchReport {
    /// Build the report from the drained result bags.
    ///
    /// Records arrive in completion order; they are sorted by pair index so
    /// the statistics are summed in the same order whatever the thread count.
    pub fn from_parts(
        total: usize,
        mut pairs: Vec<ScoredPair>,
        mut failures: Vec<PairFailure>,
        duration_ms: u64,
    ) -> Self {
        pairs.sort_by_key(|p| p.index);
        failures.sort_by_key(|f| f.index);

        let successful = pairs.len();
        let (average, min, max) = if pairs.is_empty() {
            (None, None, None)
        } else {
            let sum: f64 = pairs.iter().map(|p| p.similarity).sum();
            let min = pairs
                .iter()
                .map(|p| p.similarity)
                .fold(f64::INFINITY, f64::min);
            let max = pairs
                .iter()
                .map(|p| p.similarity)
                .fold(f64::NEG_INFINITY, f64::max);
            (Some(sum / successful as f64), Some(min), Some(max))
        };

        let notes = pairs
            .iter()
            .flat_map(|p| {
                p.notes
                    .iter()
                    .map(move |note| format!("pair {}: {}", p.index, note))
            })
            .collect();
        let errors = failures.iter().map(ToString::to_string).collect();

        Self {
            total,
            successful,
            average,
            min,
            max,
            errors,
            notes,
            pairs,
            failures,
            duration_ms,
        }
    }

    /// Pairs that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Headline outcome
    pub fn status(&self) -> BatchStatus {
        if self.total == 0 {
            BatchStatus::NoPairs
        } else if self.successful == 0 {
            BatchStatus::NoSuccess { total: self.total }
        } else {
            BatchStatus::Completed {
                successful: self.successful,
                total: self.total,
            }
        }
    }

    /// Event payload for the completion event
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_pairs: self.total,
            successful: self.successful,
            failed: self.failed(),
            average: self.average,
            duration_ms: self.duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::types::FailureKind;
    use crate::core::scorer::{PairSide, ResizeNote};
    use std::path::PathBuf;

    fn scored(index: usize, similarity: f64) -> ScoredPair {
        ScoredPair {
            index,
            a: PathBuf::from(format!("a{}.png", index)),
            b: PathBuf::from(format!("b{}.png", index)),
            similarity,
            notes: Vec::new(),
        }
    }

    fn failed(index: usize) -> PairFailure {
        PairFailure {
            index,
            a: PathBuf::from(format!("a{}.png", index)),
            b: PathBuf::from(format!("b{}.png", index)),
            kind: FailureKind::Load,
            message: "unreadable".to_string(),
        }
    }

    #[test]
    fn statistics_cover_successful_pairs_only() {
        let report = BatchReport::from_parts(
            4,
            vec![scored(2, 50.0), scored(0, 100.0), scored(3, 0.0)],
            vec![failed(1)],
            5,
        );

        assert_eq!(report.successful, 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.average, Some(50.0));
        assert_eq!(report.min, Some(0.0));
        assert_eq!(report.max, Some(100.0));
        assert_eq!(report.errors.len() + report.successful, report.total);
    }

    #[test]
    fn records_are_ordered_by_index() {
        let report = BatchReport::from_parts(
            4,
            vec![scored(3, 1.0), scored(1, 2.0)],
            vec![failed(2), failed(0)],
            0,
        );

        let scored_indices: Vec<_> = report.pairs.iter().map(|p| p.index).collect();
        assert_eq!(scored_indices, vec![1, 3]);
        assert!(report.errors[0].starts_with("pair 0"));
        assert!(report.errors[1].starts_with("pair 2"));
    }

    #[test]
    fn status_distinguishes_empty_failed_and_partial() {
        let empty = BatchReport::from_parts(0, Vec::new(), Vec::new(), 0);
        let all_failed = BatchReport::from_parts(2, Vec::new(), vec![failed(0), failed(1)], 0);
        let partial = BatchReport::from_parts(2, vec![scored(0, 90.0)], vec![failed(1)], 0);

        assert_eq!(empty.status().to_string(), "no pairs requested");
        assert!(all_failed
            .status()
            .to_string()
            .starts_with("no successful comparisons"));
        assert_eq!(all_failed.average, None);
        assert_eq!(partial.status().to_string(), "1/2 succeeded");
    }

    #[test]
    fn resize_notes_are_listed_per_pair() {
        let mut pair = scored(7, 80.0);
        pair.notes.push(ResizeNote {
            side: PairSide::B,
            from: (20, 20),
            to: (10, 10),
        });

        let report = BatchReport::from_parts(1, vec![pair], Vec::new(), 0);

        assert_eq!(
            report.notes,
            vec!["pair 7: image B resized from 20x20 to 10x10".to_string()]
        );
    }
}
