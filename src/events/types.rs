//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the similarity engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory listing events
    Scan(ScanEvent),
    /// Batch scoring events
    Batch(BatchEvent),
}

/// Events while listing an image directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing has started
    Started { path: PathBuf },
    /// An image file was found
    ImageFound { path: PathBuf },
    /// An entry could not be read but listing continues
    Error { path: PathBuf, message: String },
    /// Listing completed
    Completed { path: PathBuf, total_images: usize },
}

/// Events while scoring a batch of pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// Batch has started
    Started { total_pairs: usize },
    /// A pair finished (successfully or not)
    Progress(BatchProgressUpdate),
    /// A pair was scored
    PairScored { index: usize, similarity: f64 },
    /// Image B of a pair had to be resized before scoring
    PairResized { index: usize, note: String },
    /// A pair failed; the batch continues
    PairFailed { index: usize, message: String },
    /// Cancellation was observed; remaining pairs are skipped
    Cancelled,
    /// Batch completed
    Completed { summary: BatchSummary },
}

/// Progress information during a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgressUpdate {
    /// Number of pairs finished so far
    pub completed: usize,
    /// Total number of pairs in the batch
    pub total: usize,
    /// Image A of the pair that just finished
    pub current_path: PathBuf,
}

/// Summary of a finished batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Pairs requested
    pub total_pairs: usize,
    /// Pairs scored successfully
    pub successful: usize,
    /// Pairs that failed
    pub failed: usize,
    /// Mean similarity over successful pairs
    pub average: Option<f64>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Batch(BatchEvent::Progress(BatchProgressUpdate {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/renders/a.png"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Batch(BatchEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn summary_without_successes_serializes_null_average() {
        let summary = BatchSummary {
            total_pairs: 4,
            successful: 0,
            failed: 4,
            average: None,
            duration_ms: 12,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"average\":null"));
    }
}
