//! # Pixel Similarity
//!
//! Scores how alike two raster images are, one pair at a time or in parallel
//! batches drawn from two directories.
//!
//! ## Metric
//! The score is `100 - (mean absolute channel difference / 255 * 100)`:
//! 100 for identical pixels, 0 when every channel differs by 255.
//!
//! ## Architecture
//! - `core` - The scoring engine (pair scorer, batch runner, loaders, scanner)
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use crate::core::batch::{score_batch, BatchReport, BatchRunner};
pub use crate::core::scorer::{score_files, score_single, PairScore, PairScorer, ScorerConfig};
pub use error::{Result, SimilarityError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Filtering follows
/// `RUST_LOG`; calling it twice leaves the first subscriber in place.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
