//! Per-pair input and outcome records.

use crate::core::scorer::ResizeNote;
use crate::error::{CompareError, SimilarityError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One unit of batch work: two image paths at a position in the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePair {
    /// Position in the requested batch
    pub index: usize,
    /// Reference image
    pub a: PathBuf,
    /// Image conformed to the reference
    pub b: PathBuf,
}

impl ImagePair {
    /// Create a pair at `index`
    pub fn new(index: usize, a: impl Into<PathBuf>, b: impl Into<PathBuf>) -> Self {
        Self {
            index,
            a: a.into(),
            b: b.into(),
        }
    }

    /// Pair two path lists position by position.
    ///
    /// Callers check lengths first; extra paths on the longer side are
    /// ignored here.
    pub fn zip(paths_a: &[PathBuf], paths_b: &[PathBuf]) -> Vec<ImagePair> {
        paths_a
            .iter()
            .zip(paths_b)
            .enumerate()
            .map(|(index, (a, b))| ImagePair::new(index, a.clone(), b.clone()))
            .collect()
    }
}

/// A successfully scored pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    pub index: usize,
    pub a: PathBuf,
    pub b: PathBuf,
    /// Similarity in percent
    pub similarity: f64,
    /// Resizes applied before scoring
    pub notes: Vec<ResizeNote>,
}

/// Why a pair produced no score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The file could not be read or decoded
    Load,
    /// One of the images has zero width or height
    EmptyImage,
    /// Scoring failed for another reason (e.g. resize)
    Compare,
    /// The batch was cancelled before this pair started
    Cancelled,
    /// The worker panicked while handling this pair
    Panic,
}

impl FailureKind {
    /// Classify an error returned while scoring a pair
    pub fn classify(error: &SimilarityError) -> Self {
        match error {
            SimilarityError::Load(_) => FailureKind::Load,
            SimilarityError::Compare(CompareError::EmptyImage { .. }) => FailureKind::EmptyImage,
            _ => FailureKind::Compare,
        }
    }
}

/// A pair that failed, with a message fit for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFailure {
    pub index: usize,
    pub a: PathBuf,
    pub b: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for PairFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pair {} ({} vs {}): {}",
            self.index,
            self.a.display(),
            self.b.display(),
            self.message
        )
    }
}
