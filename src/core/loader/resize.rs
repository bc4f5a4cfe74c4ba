//! Fast SIMD-accelerated image resizing.
//!
//! Uses fast_image_resize crate which is 5-14x faster than image crate's resize.
//! Automatically uses AVX2/NEON SIMD when available.

use super::ImageResizer;
use crate::error::CompareError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

/// Fast RGBA resizer using SIMD acceleration
#[derive(Debug, Clone, Copy)]
pub struct FastResizer {
    filter: FilterType,
}

impl FastResizer {
    /// Create a resizer using bilinear convolution
    pub fn new() -> Self {
        Self {
            filter: FilterType::Bilinear,
        }
    }

    /// Resize to exact dimensions as 8-bit RGBA.
    ///
    /// The output always carries an alpha channel; images decoded without
    /// one come back fully opaque. Colour is not weighted by alpha.
    pub fn resize_rgba(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, CompareError> {
        let rgba = image.to_rgba8();
        let src_width = rgba.width();
        let src_height = rgba.height();

        if src_width == 0 || src_height == 0 {
            return Err(CompareError::ResizeFailed(
                "Invalid source dimensions".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(CompareError::ResizeFailed(
                "Invalid destination dimensions".to_string(),
            ));
        }

        let src_image =
            Image::from_vec_u8(src_width, src_height, rgba.into_raw(), PixelType::U8x4).map_err(
                |e| CompareError::ResizeFailed(format!("Failed to create source image: {}", e)),
            )?;

        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        // Channels are resampled independently: premultiplying would let a
        // transparent pixel zero out the colour that RGB-only scoring compares.
        let options = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(self.filter))
            .use_alpha(false);

        // Resizer keeps scratch buffers, so one per call keeps `&self` shareable
        let mut resizer = Resizer::new();
        resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| CompareError::ResizeFailed(e.to_string()))?;

        RgbaImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            CompareError::ResizeFailed("Failed to create result buffer".to_string())
        })
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResizer for FastResizer {
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, CompareError> {
        self.resize_rgba(image, width, height)
            .map(DynamicImage::ImageRgba8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgb([r, g, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let resized = FastResizer::new().resize(&gradient(100, 80), 10, 7).unwrap();

        assert_eq!(resized.width(), 10);
        assert_eq!(resized.height(), 7);
    }

    #[test]
    fn upscaling_works() {
        let resized = FastResizer::new().resize(&gradient(4, 4), 16, 12).unwrap();

        assert_eq!((resized.width(), resized.height()), (16, 12));
    }

    #[test]
    fn solid_colour_survives_resize() {
        let solid = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(20, 20, Rgb([40, 90, 200])));

        let resized = FastResizer::new().resize_rgba(&solid, 10, 10).unwrap();

        let expected = Rgba([40u8, 90, 200, 255]);
        for pixel in resized.pixels() {
            for (got, want) in pixel.0.iter().zip(expected.0.iter()) {
                assert!(got.abs_diff(*want) <= 1, "{:?}", pixel);
            }
        }
    }

    #[test]
    fn transparent_pixels_keep_their_colour() {
        let clear = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(20, 20, Rgba([200, 100, 50, 0])));

        let resized = FastResizer::new().resize_rgba(&clear, 10, 10).unwrap();

        for pixel in resized.pixels() {
            for (got, want) in pixel.0.iter().zip([200u8, 100, 50, 0].iter()) {
                assert!(got.abs_diff(*want) <= 1, "{:?}", pixel);
            }
        }
    }

    #[test]
    fn zero_destination_is_rejected() {
        let result = FastResizer::new().resize(&gradient(8, 8), 0, 8);
        assert!(matches!(result, Err(CompareError::ResizeFailed(_))));
    }
}
