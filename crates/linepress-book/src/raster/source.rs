// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image handling — decoding, colour normalization, white-margin
// trimming, and aspect-preserving canvas fit. Operates on in-memory images
// using the `image` crate.

use image::{DynamicImage, GrayImage, Luma, imageops};
use linepress_core::CanvasSize;
use linepress_core::error::LinepressError;
use tracing::{debug, info, instrument};

/// A decoded source image moving through the compositing pipeline.
///
/// Transformations consume `self` and return a new `SourceImage`, enabling
/// method chaining; `fit_canvas` is the terminal step that lands the content
/// on a fixed-size luminance canvas.
pub struct SourceImage {
    /// The current working image.
    image: DynamicImage,
}

impl SourceImage {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, LinepressError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            LinepressError::Decode(format!("{}: {}", path.as_ref().display(), err))
        })?;
        debug!(width = img.width(), height = img.height(), "Source image loaded");
        Ok(Self { image: img })
    }

    /// Decode an image from raw encoded bytes (PNG, JPEG, WEBP, BMP, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LinepressError> {
        let img = image::load_from_memory(data)
            .map_err(|err| LinepressError::Decode(format!("in-memory buffer: {}", err)))?;
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the wrapper and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Force a 3-channel RGB representation regardless of the source's
    /// channel count (grayscale, indexed, and RGBA sources included), so the
    /// downstream edge detection always sees the same colour model.
    pub fn normalize_rgb(self) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
        }
    }

    /// Crop away near-white margins.
    ///
    /// A pixel counts as content when its luminance is strictly below
    /// `threshold`. The crop is the tight bounding box of content pixels,
    /// expanded by `margin` pixels on each side and clamped to the image.
    /// An image with no content at all is returned unmodified.
    #[instrument(skip(self), fields(threshold, margin))]
    pub fn trim_margins(self, threshold: u8, margin: u32) -> Self {
        let gray = self.image.to_luma8();
        let (width, height) = gray.dimensions();

        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut found = false;

        for (x, y, pixel) in gray.enumerate_pixels() {
            if pixel.0[0] < threshold {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        if !found {
            debug!("No content below trim threshold; returning unchanged");
            return self;
        }

        let x0 = min_x.saturating_sub(margin);
        let y0 = min_y.saturating_sub(margin);
        let x1 = (max_x + 1 + margin).min(width);
        let y1 = (max_y + 1 + margin).min(height);

        debug!(x0, y0, x1, y1, "Trimming to content bounding box");
        Self {
            image: self.image.crop_imm(x0, y0, x1 - x0, y1 - y0),
        }
    }

    // -- Canvas fit -----------------------------------------------------------

    /// Scale to fit inside `target` preserving aspect ratio, then paste
    /// centred onto a white single-channel canvas of exactly `target` size.
    ///
    /// The scaled content never exceeds the canvas and padding is symmetric
    /// to within one pixel. An input already at the target dimensions skips
    /// the resample entirely, so the operation is pixel-identical on
    /// already-fitted pages.
    #[instrument(skip(self), fields(target = %target))]
    pub fn fit_canvas(self, target: CanvasSize) -> GrayImage {
        let (src_w, src_h) = (self.image.width(), self.image.height());

        let gray = if (src_w, src_h) == (target.width, target.height) {
            self.image.to_luma8()
        } else {
            let (new_w, new_h) = fit_dimensions(src_w, src_h, target);
            self.image
                .resize_exact(new_w, new_h, imageops::FilterType::Lanczos3)
                .to_luma8()
        };

        let (new_w, new_h) = gray.dimensions();
        let mut canvas = GrayImage::from_pixel(target.width, target.height, Luma([255u8]));
        let x = (target.width - new_w) / 2;
        let y = (target.height - new_h) / 2;
        imageops::replace(&mut canvas, &gray, x as i64, y as i64);

        info!(src_w, src_h, new_w, new_h, "Canvas fit complete");
        canvas
    }
}

/// Compute the scaled dimensions that fit `src_w` x `src_h` inside `target`
/// while preserving aspect ratio.
///
/// When the source is relatively wider than the target the new width equals
/// the target width and the height follows (truncated to an integer);
/// otherwise the height is matched. The result never exceeds the target on
/// either axis.
pub fn fit_dimensions(src_w: u32, src_h: u32, target: CanvasSize) -> (u32, u32) {
    let img_ratio = src_w as f64 / src_h as f64;
    let target_ratio = target.aspect_ratio();

    if img_ratio > target_ratio {
        let new_w = target.width;
        let new_h = ((new_w as f64 / img_ratio) as u32).clamp(1, target.height);
        (new_w, new_h)
    } else {
        let new_h = target.height;
        let new_w = ((new_h as f64 * img_ratio) as u32).clamp(1, target.width);
        (new_w, new_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn canvas(width: u32, height: u32) -> CanvasSize {
        CanvasSize::new(width, height).unwrap()
    }

    #[test]
    fn fit_dimensions_preserves_aspect_within_one_pixel() {
        let cases = [
            (640u32, 480u32, canvas(255, 330)),
            (480, 640, canvas(255, 330)),
            (1000, 1000, canvas(2550, 3300)),
            (3301, 100, canvas(2550, 3300)),
            (7, 900, canvas(255, 330)),
        ];

        for (src_w, src_h, target) in cases {
            let (new_w, new_h) = fit_dimensions(src_w, src_h, target);
            assert!(new_w <= target.width && new_h <= target.height);

            // Recompute the dependent edge from the source ratio; the fitted
            // value must agree to within a pixel of rounding.
            let ratio = src_w as f64 / src_h as f64;
            if new_w == target.width {
                let expected = new_w as f64 / ratio;
                assert!((expected - new_h as f64).abs() <= 1.0, "{src_w}x{src_h}");
            } else {
                let expected = new_h as f64 * ratio;
                assert!((expected - new_w as f64).abs() <= 1.0, "{src_w}x{src_h}");
            }
        }
    }

    #[test]
    fn fit_canvas_is_idempotent_on_exact_sized_input() {
        // A white page with a dark blob, already at the target size.
        let target = canvas(120, 160);
        let mut page = GrayImage::from_pixel(120, 160, Luma([255u8]));
        for y in 40..80 {
            for x in 30..70 {
                page.put_pixel(x, y, Luma([0u8]));
            }
        }

        let source = SourceImage::from_dynamic(DynamicImage::ImageLuma8(page.clone()));
        let fitted = source.fit_canvas(target);
        assert_eq!(fitted.dimensions(), (120, 160));
        assert!(fitted.pixels().zip(page.pixels()).all(|(a, b)| a == b));
    }

    #[test]
    fn fit_canvas_centres_with_symmetric_padding() {
        // A 100x100 square into a 200x300 canvas scales to 200x200 and sits
        // 50px from both the top and the bottom.
        let target = canvas(200, 300);
        let source = SourceImage::from_dynamic(DynamicImage::ImageLuma8(
            GrayImage::from_pixel(100, 100, Luma([0u8])),
        ));

        let fitted = source.fit_canvas(target);
        assert_eq!(fitted.dimensions(), (200, 300));
        assert_eq!(fitted.get_pixel(100, 49).0[0], 255); // padding above
        assert_eq!(fitted.get_pixel(100, 50).0[0], 0); // first content row
        assert_eq!(fitted.get_pixel(100, 249).0[0], 0); // last content row
        assert_eq!(fitted.get_pixel(100, 250).0[0], 255); // padding below
    }

    #[test]
    fn trim_margins_is_noop_on_blank_image() {
        let blank = SourceImage::from_dynamic(DynamicImage::ImageLuma8(
            GrayImage::from_pixel(80, 60, Luma([255u8])),
        ));
        let trimmed = blank.trim_margins(250, 0);
        assert_eq!((trimmed.width(), trimmed.height()), (80, 60));
    }

    #[test]
    fn trim_margins_crops_to_content() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255u8, 255, 255]));
        for y in 20..30 {
            for x in 40..60 {
                img.put_pixel(x, y, Rgb([0u8, 0, 0]));
            }
        }

        let trimmed = SourceImage::from_dynamic(DynamicImage::ImageRgb8(img))
            .trim_margins(250, 0);
        assert_eq!((trimmed.width(), trimmed.height()), (20, 10));
    }

    #[test]
    fn trim_margins_respects_extra_margin_and_bounds() {
        let mut img = GrayImage::from_pixel(50, 50, Luma([255u8]));
        img.put_pixel(0, 0, Luma([0u8]));
        img.put_pixel(10, 10, Luma([0u8]));

        // A 5px margin around the (0,0)-(10,10) box, clamped at the origin.
        let trimmed = SourceImage::from_dynamic(DynamicImage::ImageLuma8(img))
            .trim_margins(250, 5);
        assert_eq!((trimmed.width(), trimmed.height()), (16, 16));
    }

    #[test]
    fn normalize_rgb_flattens_alpha() {
        let rgba = image::RgbaImage::from_pixel(4, 4, image::Rgba([10u8, 20, 30, 128]));
        let normalized = SourceImage::from_dynamic(DynamicImage::ImageRgba8(rgba)).normalize_rgb();
        assert!(matches!(normalized.as_dynamic(), DynamicImage::ImageRgb8(_)));
    }
}
