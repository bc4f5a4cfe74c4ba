//! # Loader Module
//!
//! Seams to the imaging collaborators the engine consumes: decoding files
//! and resizing decoded images.
//!
//! ## Default Implementations
//! - [`FastDecoder`] - `zune-jpeg` for JPEG, `image` crate for everything else
//! - [`FastResizer`] - SIMD bilinear resizing via `fast_image_resize`
//!
//! Tests and embedders can plug in their own implementations, e.g. a loader
//! that synthesizes images in memory.

mod decode;
mod resize;

pub use decode::{FastDecoder, ImageFormat};
pub use resize::FastResizer;

use crate::error::{CompareError, LoadError};
use image::DynamicImage;
use std::path::Path;

/// Decodes an image file into memory.
pub trait ImageLoader: Send + Sync {
    /// Load and decode the image at `path`
    fn load(&self, path: &Path) -> Result<DynamicImage, LoadError>;
}

/// Resizes a decoded image to exact target dimensions.
///
/// Implementations must be deterministic: the same input and target always
/// produce the same pixels.
pub trait ImageResizer: Send + Sync {
    /// Resize `image` to `width` x `height`
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, CompareError>;
}
