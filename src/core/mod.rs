//! # Core Module
//!
//! The similarity engine.
//!
//! ## Modules
//! - `scorer` - Scores one image pair (normalization + SIMD accumulation)
//! - `batch` - Scores many pairs in parallel and builds a report
//! - `loader` - Decoding and resizing collaborators
//! - `scanner` - Lists and pairs image directories

pub mod batch;
pub mod loader;
pub mod scanner;
pub mod scorer;

// Re-export commonly used types
pub use batch::{BatchReport, BatchRunner, ImagePair};
pub use loader::{ImageLoader, ImageResizer};
pub use scorer::{PairScore, PairScorer, ScorerConfig};
