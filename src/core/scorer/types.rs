//! Scorer configuration and result types.

use serde::{Deserialize, Serialize};

/// Which side of a pair an image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairSide {
    A,
    B,
}

impl std::fmt::Display for PairSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairSide::A => write!(f, "A"),
            PairSide::B => write!(f, "B"),
        }
    }
}

/// Records that an image was resized before differencing.
///
/// Informational only: a resized pair still produces a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeNote {
    pub side: PairSide,
    pub from: (u32, u32),
    pub to: (u32, u32),
}

impl std::fmt::Display for ResizeNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "image {} resized from {}x{} to {}x{}",
            self.side, self.from.0, self.from.1, self.to.0, self.to.1
        )
    }
}

/// Outcome of scoring one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    /// Similarity in percent, 0 (opposite) to 100 (identical)
    pub similarity: f64,
    /// Resizes applied before differencing
    pub notes: Vec<ResizeNote>,
}

impl PairScore {
    /// All resize notes joined into one line, if any resize happened
    pub fn note(&self) -> Option<String> {
        if self.notes.is_empty() {
            return None;
        }
        Some(
            self.notes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Configuration for the pair scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Whether alpha takes part in the difference and the divisor
    pub include_alpha: bool,
    /// Allow vector kernels (false forces the scalar loop)
    pub simd: bool,
    /// Conform both images to this working resolution before scoring
    pub sample_size: Option<(u32, u32)>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            include_alpha: false,
            simd: true,
            sample_size: None,
        }
    }
}

impl ScorerConfig {
    /// Create a configuration with defaults (RGB only, SIMD on, no sampling)
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the alpha channel in the comparison
    pub fn include_alpha(mut self, include: bool) -> Self {
        self.include_alpha = include;
        self
    }

    /// Enable or disable vector kernels
    pub fn simd(mut self, enabled: bool) -> Self {
        self.simd = enabled;
        self
    }

    /// Compare at a fixed working resolution
    pub fn sample_size(mut self, width: u32, height: u32) -> Self {
        self.sample_size = Some((width, height));
        self
    }

    /// Number of channels that take part in the comparison
    pub fn channel_count(&self) -> usize {
        if self.include_alpha {
            4
        } else {
            3
        }
    }
}
