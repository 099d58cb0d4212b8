// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — turns one raw source image into a canvas-fitted
// monochrome coloring page: colour normalization, optional white-margin
// trim, aspect-preserving canvas fit, edge binarization, and morphological
// line thickening.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::filter3x3;
use imageproc::morphology::dilate;
use linepress_core::config::{BookConfig, DEFAULT_THICKEN_RADIUS, DEFAULT_THRESHOLD};
use linepress_core::error::{LinepressError, Result};
use linepress_core::types::CanvasSize;
use tracing::{debug, info, instrument};

use crate::raster::source::SourceImage;

/// Luminance below which a pixel counts as content during margin trimming.
pub const TRIM_THRESHOLD: u8 = 250;

/// 3x3 edge kernel (-1 ring, +8 centre): zero response on flat regions,
/// strong response at intensity transitions, no directional bias.
const EDGE_KERNEL: [i16; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

/// Produces one canvas-fitted monochrome page from one source image.
///
/// Purely functional over its inputs: no state is carried between calls, so
/// batches of independent images can be composited from any number of
/// threads as long as each writes its own output.
///
/// ```ignore
/// let compositor = PageCompositor::new(CanvasSize::new(2550, 3300)?);
/// let page = compositor.compose_path("input/fox.png")?;
/// ```
#[derive(Debug, Clone)]
pub struct PageCompositor {
    /// Target page geometry in pixels.
    canvas: CanvasSize,
    /// Binarization threshold applied to the inverted edge response.
    threshold: u8,
    /// Dilation radius in pixels; 0 disables thickening.
    thicken_radius: u8,
    /// Trim near-white margins before fitting.
    trim_margins: bool,
}

impl PageCompositor {
    /// Create a compositor with the stock threshold and thickening radius.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            threshold: DEFAULT_THRESHOLD,
            thicken_radius: DEFAULT_THICKEN_RADIUS,
            trim_margins: false,
        }
    }

    /// Create a compositor from a book configuration and an explicit canvas.
    pub fn from_config(config: &BookConfig, canvas: CanvasSize) -> Self {
        Self {
            canvas,
            threshold: config.threshold,
            thicken_radius: config.thicken_radius,
            trim_margins: config.trim_margins,
        }
    }

    /// Set the binarization threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the line-thickening radius (0 disables thickening).
    pub fn with_thicken_radius(mut self, radius: u8) -> Self {
        self.thicken_radius = radius;
        self
    }

    /// Enable or disable white-margin trimming.
    pub fn with_trim_margins(mut self, trim: bool) -> Self {
        self.trim_margins = trim;
        self
    }

    /// Target page geometry.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    // -- Pipeline -------------------------------------------------------------

    /// Run the full pipeline on an already-decoded source.
    ///
    /// Steps, in order: colour normalization, optional margin trim, canvas
    /// fit, edge binarization, line thickening. The result is a
    /// single-channel image at exactly the canvas dimensions with every
    /// pixel either 0 or 255.
    #[instrument(skip(self, source), fields(
        canvas = %self.canvas,
        threshold = self.threshold,
        thicken_radius = self.thicken_radius,
    ))]
    pub fn compose(&self, source: SourceImage) -> Result<GrayImage> {
        if source.width() == 0 || source.height() == 0 {
            return Err(LinepressError::InvalidInput(format!(
                "source image has degenerate dimensions {}x{}",
                source.width(),
                source.height()
            )));
        }

        let mut working = source.normalize_rgb();
        if self.trim_margins {
            working = working.trim_margins(TRIM_THRESHOLD, 0);
        }

        let fitted = working.fit_canvas(self.canvas);
        debug!("Fit complete, extracting line art");

        let mask = edge_line_art(&fitted, self.threshold);
        let page = thicken(&mask, self.thicken_radius);

        info!(
            width = page.width(),
            height = page.height(),
            "Page composited"
        );
        Ok(page)
    }

    /// Decode a file and run the pipeline on it.
    pub fn compose_path(&self, path: impl AsRef<std::path::Path>) -> Result<GrayImage> {
        self.compose(SourceImage::open(path)?)
    }

    /// Decode raw bytes and run the pipeline on them.
    pub fn compose_bytes(&self, data: &[u8]) -> Result<GrayImage> {
        self.compose(SourceImage::from_bytes(data)?)
    }
}

// -- Binarization -------------------------------------------------------------

/// Extract a binary line mask from a luminance image.
///
/// The edge kernel response is clamped to u8 and inverted (`255 - v`) so
/// detected edges become dark; a pixel is classified as ink (255 in the
/// working mask) iff its inverted value is strictly below `threshold`,
/// otherwise background (0). Repeated luminance conversion upstream is
/// harmless: the input is already single-channel.
pub fn edge_line_art(gray: &GrayImage, threshold: u8) -> GrayImage {
    let edges: GrayImage = filter3x3::<Luma<u8>, i16, u8>(gray, &EDGE_KERNEL);

    let mut mask = GrayImage::new(edges.width(), edges.height());
    for (out, edge) in mask.pixels_mut().zip(edges.pixels()) {
        let inverted = 255u8 - edge.0[0];
        out.0[0] = if inverted < threshold { 255 } else { 0 };
    }
    mask
}

// -- Thickening ---------------------------------------------------------------

/// Thicken a binary line mask by morphological dilation with a full square
/// structuring element of side `2 * radius + 1`.
///
/// Border pixels see the maximum over the in-bounds part of their window,
/// which is identical to dilating an edge-replicated padding. Radius 0 is
/// the identity.
pub fn thicken(mask: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    dilate(mask, Norm::LInf, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn canvas(width: u32, height: u32) -> CanvasSize {
        CanvasSize::new(width, height).unwrap()
    }

    /// Count ink pixels (value 255) in a mask.
    fn ink_count(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] == 255).count()
    }

    #[test]
    fn thicken_radius_zero_is_identity() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(10, 10, Luma([255u8]));
        mask.put_pixel(3, 7, Luma([255u8]));

        let out = thicken(&mask, 0);
        assert!(out.pixels().zip(mask.pixels()).all(|(a, b)| a == b));
    }

    #[test]
    fn thicken_single_pixel_becomes_square_block() {
        let mut mask = GrayImage::new(21, 21);
        mask.put_pixel(10, 10, Luma([255u8]));

        let out = thicken(&mask, 2);
        // A full 5x5 block around the seed, nothing else.
        for y in 0..21 {
            for x in 0..21 {
                let expected = (8..=12).contains(&x) && (8..=12).contains(&y);
                assert_eq!(
                    out.get_pixel(x, y).0[0] == 255,
                    expected,
                    "pixel ({x},{y})"
                );
            }
        }
    }

    #[test]
    fn thicken_is_monotonic_in_radius() {
        // An irregular mask: diagonal strokes plus isolated dots.
        let mut mask = GrayImage::new(40, 40);
        for i in 5..30 {
            mask.put_pixel(i, i, Luma([255u8]));
        }
        mask.put_pixel(2, 35, Luma([255u8]));
        mask.put_pixel(38, 1, Luma([255u8]));

        let r1 = thicken(&mask, 1);
        let r3 = thicken(&mask, 3);

        // Every ink pixel at radius 1 must still be ink at radius 3.
        for (a, b) in r1.pixels().zip(r3.pixels()) {
            if a.0[0] == 255 {
                assert_eq!(b.0[0], 255);
            }
        }
        assert!(ink_count(&r3) > ink_count(&r1));
    }

    #[test]
    fn thicken_preserves_ink_at_image_border() {
        // Ink on the border must dilate inward without artifacts.
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(0, 0, Luma([255u8]));

        let out = thicken(&mask, 1);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
        assert_eq!(out.get_pixel(1, 1).0[0], 255);
        assert_eq!(out.get_pixel(2, 2).0[0], 0);
    }

    #[test]
    fn edge_line_art_marks_transitions_not_flat_regions() {
        // Left half dark, right half light: ink only along the boundary.
        let mut gray = GrayImage::from_pixel(20, 20, Luma([230u8]));
        for y in 0..20 {
            for x in 0..10 {
                gray.put_pixel(x, y, Luma([40u8]));
            }
        }

        let mask = edge_line_art(&gray, 160);

        // Flat interior on both sides stays background.
        assert_eq!(mask.get_pixel(3, 10).0[0], 0);
        assert_eq!(mask.get_pixel(16, 10).0[0], 0);
        // The bright side of the step responds positively and becomes ink;
        // the dark side's negative response clamps to zero and stays out.
        assert_eq!(mask.get_pixel(10, 10).0[0], 255);
        assert_eq!(mask.get_pixel(9, 10).0[0], 0);
    }

    #[test]
    fn edge_line_art_output_is_binary() {
        let mut gray = GrayImage::from_pixel(16, 16, Luma([255u8]));
        for i in 4..12 {
            gray.put_pixel(i, 8, Luma([0u8]));
        }

        let mask = edge_line_art(&gray, 160);
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn compose_produces_canvas_sized_binary_page() {
        // A light picture with a dark shape, smaller than the canvas.
        let mut img = GrayImage::from_pixel(60, 80, Luma([240u8]));
        for y in 20..60 {
            for x in 15..45 {
                img.put_pixel(x, y, Luma([30u8]));
            }
        }

        let compositor = PageCompositor::new(canvas(120, 160))
            .with_threshold(160)
            .with_thicken_radius(2);
        let page = compositor
            .compose(SourceImage::from_dynamic(DynamicImage::ImageLuma8(img)))
            .unwrap();

        assert_eq!(page.dimensions(), (120, 160));
        assert!(page.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(ink_count(&page) > 0, "the shape outline must survive");
    }

    #[test]
    fn compose_thickening_grows_the_ink_set() {
        let mut img = GrayImage::from_pixel(60, 80, Luma([240u8]));
        for y in 20..60 {
            for x in 15..45 {
                img.put_pixel(x, y, Luma([30u8]));
            }
        }
        let source = DynamicImage::ImageLuma8(img);

        let thin = PageCompositor::new(canvas(120, 160))
            .with_thicken_radius(0)
            .compose(SourceImage::from_dynamic(source.clone()))
            .unwrap();
        let thick = PageCompositor::new(canvas(120, 160))
            .with_thicken_radius(3)
            .compose(SourceImage::from_dynamic(source))
            .unwrap();

        assert!(ink_count(&thick) > ink_count(&thin));
    }

    #[test]
    fn compose_rejects_degenerate_source() {
        let empty = SourceImage::from_dynamic(DynamicImage::new_luma8(0, 0));
        let err = PageCompositor::new(canvas(100, 100)).compose(empty).unwrap_err();
        assert!(matches!(err, LinepressError::InvalidInput(_)));
    }

    #[test]
    fn compose_accepts_blank_input_with_trim_enabled() {
        // Trimming a blank page is a no-op, not an error; the pipeline runs on.
        let blank = GrayImage::from_pixel(50, 50, Luma([255u8]));
        let page = PageCompositor::new(canvas(80, 80))
            .with_trim_margins(true)
            .compose(SourceImage::from_dynamic(DynamicImage::ImageLuma8(blank)))
            .unwrap();
        assert_eq!(page.dimensions(), (80, 80));
    }
}
