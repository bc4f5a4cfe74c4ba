//! # Error Module
//!
//! Error types for the similarity engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, dimensions, what went wrong
//! - **Contain per-pair failures** - only batch preconditions abort a batch

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("Loading error: {0}")]
    Load(#[from] LoadError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that occur while listing image directories
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding an image from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while scoring a single pair
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Image is empty ({width}x{height}), nothing to compare")]
    EmptyImage { width: u32, height: u32 },

    #[error("Image dimensions differ: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },

    #[error("Resize failed: {0}")]
    ResizeFailed(String),
}

/// Errors that abort a whole batch before any pair is scored
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Batch size mismatch: {left} images on the left, {right} on the right")]
    BatchSizeMismatch { left: usize, right: usize },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SimilarityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_includes_path() {
        let error = LoadError::DecodeError {
            path: PathBuf::from("/renders/broken.png"),
            reason: "invalid PNG signature".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/renders/broken.png"));
        assert!(message.contains("invalid PNG signature"));
    }

    #[test]
    fn empty_image_reports_dimensions() {
        let error = CompareError::EmptyImage {
            width: 0,
            height: 12,
        };
        assert!(error.to_string().contains("0x12"));
    }

    #[test]
    fn batch_size_mismatch_reports_both_sides() {
        let error = BatchError::BatchSizeMismatch { left: 3, right: 5 };
        let message = error.to_string();
        assert!(message.contains('3'));
        assert!(message.contains('5'));
    }

    #[test]
    fn json_errors_are_serialization_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SimilarityError = json_error.into();
        assert!(matches!(error, SimilarityError::Serialization(_)));
        assert!(error.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn nested_errors_convert_to_top_level() {
        let error: SimilarityError = BatchError::BatchSizeMismatch { left: 1, right: 0 }.into();
        assert!(matches!(
            error,
            SimilarityError::Batch(BatchError::BatchSizeMismatch { .. })
        ));
    }
}
