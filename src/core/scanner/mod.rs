//! # Scanner Module
//!
//! Lists image files in directories and pairs two directories for a batch.
//!
//! ## Supported Extensions
//! JPEG, PNG, WebP, GIF, BMP and TIFF, matched case-insensitively.
//!
//! ## Example
//! ```rust,ignore
//! use pixel_similarity::core::scanner::{pair_directories, PairBy, WalkDirScanner};
//!
//! let pairs = pair_directories(
//!     &WalkDirScanner::default(),
//!     "expected".as_ref(),
//!     "actual".as_ref(),
//!     PairBy::Index,
//!     &null_sender(),
//! )?;
//! ```

mod filter;
mod pairing;
mod walker;

pub use filter::ImageFilter;
pub use pairing::{pair_directories, DirectoryPairs, PairBy};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::{null_sender, EventSender};
use std::path::{Path, PathBuf};

/// Result of listing one directory
#[derive(Debug)]
pub struct ScanResult {
    /// Image files found, sorted by path
    pub images: Vec<PathBuf>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for directory scanners
///
/// Implement this trait to plug in another listing source (e.g., for testing).
pub trait DirectoryScanner: Send + Sync {
    /// List images under `root`
    fn list(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.list_with_events(root, &null_sender())
    }

    /// List images with progress reporting via events
    fn list_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError>;
}
