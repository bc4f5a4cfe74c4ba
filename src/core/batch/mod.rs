//! # Batch Module
//!
//! Scores many image pairs in parallel and summarizes them.
//!
//! ## Execution
//! 1. **Check** - both path lists must be the same length, else nothing runs
//! 2. **Dispatch** - one unit of work per pair on a rayon pool
//! 3. **Collect** - each unit appends a score or a failure to shared bags
//! 4. **Report** - after the pool joins, statistics are computed once
//!
//! A failing pair (bad file, empty image, even a panic) becomes a failure
//! record; it never stops the other pairs.
//!
//! ## Example
//! ```rust,ignore
//! let runner = BatchRunner::builder().threads(8).build();
//! let report = runner.score_batch(&expected, &actual)?;
//! println!("{}", report.status());
//! ```

mod aggregate;
mod executor;
mod report;
mod types;

pub use aggregate::{BatchProgress, CancellationToken, ResultBag};
pub use executor::{score_batch, BatchConfig, BatchRunner, BatchRunnerBuilder};
pub use report::{BatchReport, BatchStatus};
pub use types::{FailureKind, ImagePair, PairFailure, ScoredPair};
