//! Fast image decoding with format-specific optimizations.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats.

use super::ImageLoader;
use crate::error::LoadError;
use image::{DynamicImage, ImageBuffer, ImageError, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Image formats with a dedicated decode path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Other,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            _ => Self::Other,
        }
    }
}

/// Fast image decoder that uses optimized decoders per format
#[derive(Debug, Clone, Copy, Default)]
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image from a file path using the fastest available decoder.
    pub fn decode(path: &Path) -> Result<DynamicImage, LoadError> {
        match ImageFormat::from_path(path) {
            ImageFormat::Jpeg => Self::decode_jpeg(path).or_else(|e| match e {
                LoadError::IoError { .. } => Err(e),
                LoadError::DecodeError { .. } => Self::decode_fallback(path),
            }),
            ImageFormat::Other => Self::decode_fallback(path),
        }
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, LoadError> {
        let file_bytes = fs::read(path).map_err(|e| LoadError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| LoadError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| LoadError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;
        let buffer_error = |kind: &str| LoadError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("Failed to create {} buffer", kind),
        };

        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGB"))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGBA"))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("Luma"))?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, LoadError> {
        image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => LoadError::IoError {
                path: path.to_path_buf(),
                source,
            },
            other => LoadError::DecodeError {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

impl ImageLoader for FastDecoder {
    fn load(&self, path: &Path) -> Result<DynamicImage, LoadError> {
        Self::decode(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn format_detection_jpeg() {
        assert_eq!(ImageFormat::from_path(Path::new("shot.jpg")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("shot.JPEG")), ImageFormat::Jpeg);
    }

    #[test]
    fn format_detection_other() {
        assert_eq!(ImageFormat::from_path(Path::new("shot.png")), ImageFormat::Other);
        assert_eq!(ImageFormat::from_path(Path::new("no_extension")), ImageFormat::Other);
    }

    #[test]
    fn decodes_png_written_by_image_crate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("red.png");
        RgbImage::from_pixel(3, 2, Rgb([255, 0, 0])).save(&path).unwrap();

        let image = FastDecoder.load(&path).unwrap();

        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.to_rgb8().get_pixel(1, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.png");
        fs::write(&path, b"this is not a valid image file").unwrap();

        let result = FastDecoder.load(&path);

        assert!(matches!(result, Err(LoadError::DecodeError { .. })));
    }

    #[test]
    fn missing_jpeg_is_io_error() {
        let result = FastDecoder.load(Path::new("/nonexistent/dir/missing.jpg"));
        assert!(matches!(result, Err(LoadError::IoError { .. })));
    }
}
