//! # Scorer Module
//!
//! Scores one image pair by mean absolute channel difference.
//!
//! ## How It Works
//! 1. Reject empty images
//! 2. Conform image B to image A's dimensions (or both to a sample size)
//! 3. Sum `|a - b|` over every active channel byte, one row at a time,
//!    using the widest SAD kernel the CPU offers
//! 4. `similarity = 100 - (total / (pixels * channels) / 255 * 100)`
//!
//! ## Asymmetry
//! Image A is always the reference. When sizes differ, B is resampled and
//! the detail it loses is gone, so `score(a, b)` and `score(b, a)` can
//! disagree for differently sized images. Equal-sized pairs are symmetric.
//!
//! ## Example
//! ```rust,ignore
//! use pixel_similarity::core::scorer::{PairScorer, ScorerConfig};
//!
//! let scorer = PairScorer::new(ScorerConfig::new().include_alpha(true));
//! let score = scorer.score(&expected, &actual)?;
//! println!("{:.2}%", score.similarity);
//! ```

pub mod kernel;
mod types;

pub use kernel::Kernel;
pub use types::{PairScore, PairSide, ResizeNote, ScorerConfig};

use crate::core::loader::{FastDecoder, FastResizer, ImageLoader, ImageResizer};
use crate::error::{CompareError, SimilarityError};
use image::DynamicImage;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Scores image pairs with a fixed channel mode and kernel.
///
/// Cheap to share between threads: the only state is configuration.
#[derive(Clone)]
pub struct PairScorer {
    config: ScorerConfig,
    kernel: Kernel,
    resizer: Arc<dyn ImageResizer>,
}

impl PairScorer {
    /// Create a scorer that resizes with [`FastResizer`]
    pub fn new(config: ScorerConfig) -> Self {
        Self::with_resizer(config, Arc::new(FastResizer::new()))
    }

    /// Create a scorer with a custom resize collaborator
    pub fn with_resizer(config: ScorerConfig, resizer: Arc<dyn ImageResizer>) -> Self {
        let kernel = if config.simd {
            Kernel::detect()
        } else {
            Kernel::Scalar
        };
        tracing::debug!(%kernel, include_alpha = config.include_alpha, "pair scorer ready");

        Self {
            config,
            kernel,
            resizer,
        }
    }

    /// The configuration this scorer was built with
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// The difference kernel selected for this CPU
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Score a pair of decoded images.
    ///
    /// Image A sets the reference dimensions; image B is resized to match
    /// when they differ, and the resize is returned as a note.
    pub fn score(&self, a: &DynamicImage, b: &DynamicImage) -> Result<PairScore, CompareError> {
        ensure_not_empty(a)?;
        ensure_not_empty(b)?;

        let mut notes = Vec::new();
        let (target_width, target_height) = match self.config.sample_size {
            Some((0, _)) | Some((_, 0)) => {
                return Err(CompareError::ResizeFailed(
                    "Sample size must be non-zero".to_string(),
                ))
            }
            Some(size) => size,
            None => (a.width(), a.height()),
        };

        let a = self.conform(a, PairSide::A, target_width, target_height, &mut notes)?;
        let b = self.conform(b, PairSide::B, target_width, target_height, &mut notes)?;

        let channels = self.config.channel_count();
        let a_bytes = channel_bytes(&a, self.config.include_alpha);
        let b_bytes = channel_bytes(&b, self.config.include_alpha);

        let total = self.total_difference(&a_bytes, &b_bytes, target_width as usize * channels);
        let pixel_count = f64::from(target_width) * f64::from(target_height);
        let average_difference = total / (pixel_count * channels as f64);
        let similarity = 100.0 - (average_difference / 255.0 * 100.0);

        Ok(PairScore { similarity, notes })
    }

    /// Sum of absolute differences over rows of `row_len` bytes.
    ///
    /// Row sums are exact integers; adding them as `f64` in any order gives
    /// the same total because every term is non-negative and far below 2^53.
    pub fn total_difference(&self, a: &[u8], b: &[u8], row_len: usize) -> f64 {
        if row_len == 0 {
            return 0.0;
        }

        let kernel = self.kernel.for_row(row_len);
        a.chunks_exact(row_len)
            .zip(b.chunks_exact(row_len))
            .map(|(row_a, row_b)| kernel.sum_abs_diff(row_a, row_b) as f64)
            .sum()
    }

    fn conform<'a>(
        &self,
        image: &'a DynamicImage,
        side: PairSide,
        width: u32,
        height: u32,
        notes: &mut Vec<ResizeNote>,
    ) -> Result<Cow<'a, DynamicImage>, CompareError> {
        if image.width() == width && image.height() == height {
            return Ok(Cow::Borrowed(image));
        }

        let note = ResizeNote {
            side,
            from: (image.width(), image.height()),
            to: (width, height),
        };
        tracing::debug!(%note, "conforming image dimensions");

        let resized = self.resizer.resize(image, width, height)?;
        if resized.width() != width || resized.height() != height {
            return Err(CompareError::DimensionMismatch {
                a_width: width,
                a_height: height,
                b_width: resized.width(),
                b_height: resized.height(),
            });
        }

        notes.push(note);
        Ok(Cow::Owned(resized))
    }
}

impl Default for PairScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

/// Score one pair with the default configuration (RGB, SIMD, A as reference)
pub fn score_single(a: &DynamicImage, b: &DynamicImage) -> Result<PairScore, CompareError> {
    PairScorer::default().score(a, b)
}

/// Decode two files with [`FastDecoder`] and score them
pub fn score_files(
    path_a: &Path,
    path_b: &Path,
    config: ScorerConfig,
) -> Result<PairScore, SimilarityError> {
    let a = FastDecoder.load(path_a)?;
    let b = FastDecoder.load(path_b)?;
    Ok(PairScorer::new(config).score(&a, &b)?)
}

fn ensure_not_empty(image: &DynamicImage) -> Result<(), CompareError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CompareError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Interleaved bytes of the active channels, borrowed when the image is
/// already in the right layout.
fn channel_bytes(image: &DynamicImage, include_alpha: bool) -> Cow<'_, [u8]> {
    match (image, include_alpha) {
        (DynamicImage::ImageRgba8(buffer), true) => Cow::Borrowed(buffer.as_raw().as_slice()),
        (DynamicImage::ImageRgb8(buffer), false) => Cow::Borrowed(buffer.as_raw().as_slice()),
        (_, true) => Cow::Owned(image.to_rgba8().into_raw()),
        (_, false) => Cow::Owned(image.to_rgb8().into_raw()),
    }
}
