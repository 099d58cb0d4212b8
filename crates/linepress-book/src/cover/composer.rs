// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover composer — build a front-cover image: optional background art
// fitted and centred, a translucent readability band, and title / subtitle /
// brand text rendered with `ab_glyph` through `imageproc`'s drawing
// routines. Background art is supplied by the caller; how it was obtained
// (generation service, stock art, a drawing) is not this module's concern.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use linepress_core::error::{LinepressError, Result};
use linepress_core::types::CanvasSize;
use tracing::{debug, info, instrument};

use crate::raster::encode::write_png_rgb;
use crate::raster::source::fit_dimensions;

/// Overall cover brightness; drives canvas, band, and text colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backdrop {
    #[default]
    Light,
    Dark,
}

/// Starting title size in pixels; shrunk in steps until the title fits.
const TITLE_SCALE: f32 = 140.0;
/// Smallest title size the shrink-to-fit search will accept.
const TITLE_SCALE_MIN: f32 = 64.0;
/// Fraction of the canvas width the title may occupy.
const TITLE_MAX_WIDTH_FRAC: f32 = 0.88;
/// Fraction of the canvas height covered by the readability band.
const BAND_HEIGHT_FRAC: f32 = 0.35;

/// Composes a front cover: backdrop, optional background image, and text.
pub struct CoverComposer {
    /// Cover geometry in pixels.
    size: CanvasSize,
    backdrop: Backdrop,
    title: String,
    subtitle: Option<String>,
    brand: Option<String>,
    /// Pre-decoded background art, fitted and centred when present.
    background: Option<DynamicImage>,
    /// Explicit TrueType font; system candidates are searched otherwise.
    font_path: Option<PathBuf>,
}

impl CoverComposer {
    /// Create a composer with the stock 2560x1600 cover geometry.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            size: CanvasSize {
                width: 2560,
                height: 1600,
            },
            backdrop: Backdrop::Light,
            title: title.into(),
            subtitle: None,
            brand: None,
            background: None,
            font_path: None,
        }
    }

    /// Override the cover geometry.
    pub fn with_size(mut self, size: CanvasSize) -> Self {
        self.size = size;
        self
    }

    /// Set the overall brightness mode.
    pub fn with_backdrop(mut self, backdrop: Backdrop) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Set a subtitle line below the title.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the brand footer line.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Supply background art to fit behind the text.
    pub fn with_background(mut self, image: DynamicImage) -> Self {
        self.background = Some(image);
        self
    }

    /// Use a specific TrueType font file instead of searching the system.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    // -- Composition ----------------------------------------------------------

    /// Render the cover.
    #[instrument(skip(self), fields(size = %self.size, backdrop = ?self.backdrop))]
    pub fn compose(&self) -> Result<RgbImage> {
        let (width, height) = (self.size.width, self.size.height);
        let canvas_color = match self.backdrop {
            Backdrop::Light => Rgb([255u8, 255, 255]),
            Backdrop::Dark => Rgb([20u8, 24, 32]),
        };
        let mut canvas = RgbImage::from_pixel(width, height, canvas_color);

        if let Some(background) = &self.background {
            let (new_w, new_h) =
                fit_dimensions(background.width(), background.height(), self.size);
            let fitted = background
                .resize_exact(new_w, new_h, imageops::FilterType::Lanczos3)
                .to_rgb8();
            let x = (width - new_w) / 2;
            let y = (height - new_h) / 2;
            imageops::replace(&mut canvas, &fitted, x as i64, y as i64);
            debug!(new_w, new_h, "Background fitted");
        }

        // Translucent band over the title area for readability.
        match self.backdrop {
            Backdrop::Light => blend_band(&mut canvas, BAND_HEIGHT_FRAC, Rgb([255, 255, 255]), 90),
            Backdrop::Dark => blend_band(&mut canvas, BAND_HEIGHT_FRAC, Rgb([0, 0, 0]), 110),
        }

        let font = self.load_font()?;
        let fg = match self.backdrop {
            Backdrop::Light => Rgb([20u8, 24, 32]),
            Backdrop::Dark => Rgb([245u8, 247, 250]),
        };
        let shadow = Rgb([0u8, 0, 0]);

        // Title, shrunk until it fits the width cap.
        let max_title_width = (width as f32 * TITLE_MAX_WIDTH_FRAC) as i64;
        let title_scale = shrink_to_fit(&font, &self.title, TITLE_SCALE, max_title_width);
        let (title_w, title_h) = measure(&font, title_scale, &self.title);
        let title_x = ((width as i64 - title_w) / 2).max(0) as i32;
        let title_y = (height as f32 * 0.10) as i32;

        draw_shadowed(
            &mut canvas,
            &font,
            title_scale,
            &self.title,
            title_x,
            title_y,
            fg,
            shadow,
            2,
        );

        // Subtitle, scaled relative to the title.
        if let Some(subtitle) = &self.subtitle {
            let subtitle_scale = (title_scale * 0.4).max(48.0);
            let (sub_w, _sub_h) = measure(&font, subtitle_scale, subtitle);
            let sub_x = ((width as i64 - sub_w) / 2).max(0) as i32;
            let sub_y = title_y + title_h as i32 + 20;
            draw_shadowed(
                &mut canvas,
                &font,
                subtitle_scale,
                subtitle,
                sub_x,
                sub_y,
                fg,
                shadow,
                1,
            );
        }

        // Brand footer at the bottom edge.
        if let Some(brand) = &self.brand {
            let brand_scale = 50.0;
            let (brand_w, brand_h) = measure(&font, brand_scale, brand);
            let brand_x = ((width as i64 - brand_w) / 2).max(0) as i32;
            let brand_y = (height as i64 - brand_h - 40).max(0) as i32;
            draw_shadowed(
                &mut canvas,
                &font,
                brand_scale,
                brand,
                brand_x,
                brand_y,
                fg,
                shadow,
                1,
            );
        }

        info!("Cover composed");
        Ok(canvas)
    }

    /// Render the cover and write it to `path` as PNG with `dpi` metadata.
    pub fn write_to_file(&self, path: impl AsRef<Path>, dpi: u32) -> Result<()> {
        let cover = self.compose()?;
        write_png_rgb(path.as_ref(), &cover, dpi)?;
        info!("Wrote cover to {}", path.as_ref().display());
        Ok(())
    }

    // -- Fonts ----------------------------------------------------------------

    fn load_font(&self) -> Result<FontVec> {
        let path = match &self.font_path {
            Some(path) => path.clone(),
            None => find_system_font().ok_or_else(|| {
                LinepressError::Font(
                    "no usable TrueType font found; supply one with with_font_path".into(),
                )
            })?,
        };

        let data = std::fs::read(&path).map_err(|err| {
            LinepressError::Font(format!("{}: {}", path.display(), err))
        })?;
        FontVec::try_from_vec(data)
            .map_err(|err| LinepressError::Font(format!("{}: {}", path.display(), err)))
    }
}

/// Search well-known system locations for a bold-ish TrueType font.
pub fn find_system_font() -> Option<PathBuf> {
    let candidates = [
        "C:/Windows/Fonts/SegoeUI-Bold.ttf",
        "C:/Windows/Fonts/arialbd.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/Library/Fonts/Arial Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ];
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

// -- Helpers ------------------------------------------------------------------

/// Measure rendered text extents at `scale`.
fn measure(font: &FontVec, scale: f32, text: &str) -> (i64, i64) {
    let (w, h) = text_size(PxScale::from(scale), font, text);
    (w as i64, h as i64)
}

/// Shrink the scale in steps of 6 until the text fits `max_width`, stopping
/// at the minimum title size.
fn shrink_to_fit(font: &FontVec, text: &str, start: f32, max_width: i64) -> f32 {
    let mut scale = start;
    while scale > TITLE_SCALE_MIN {
        let (w, _) = measure(font, scale, text);
        if w <= max_width {
            return scale;
        }
        scale -= 6.0;
    }
    TITLE_SCALE_MIN
}

/// Draw text with a solid drop shadow offset by `offset` pixels.
#[allow(clippy::too_many_arguments)]
fn draw_shadowed(
    canvas: &mut RgbImage,
    font: &FontVec,
    scale: f32,
    text: &str,
    x: i32,
    y: i32,
    fg: Rgb<u8>,
    shadow: Rgb<u8>,
    offset: i32,
) {
    let px_scale = PxScale::from(scale);
    draw_text_mut(canvas, shadow, x + offset, y + offset, px_scale, font, text);
    draw_text_mut(canvas, fg, x, y, px_scale, font, text);
}

/// Alpha-blend a horizontal band of `overlay` across the top of the canvas.
fn blend_band(canvas: &mut RgbImage, height_frac: f32, overlay: Rgb<u8>, alpha: u8) {
    let band_height = (canvas.height() as f32 * height_frac) as u32;
    let alpha = alpha as u16;
    for y in 0..band_height.min(canvas.height()) {
        for x in 0..canvas.width() {
            let pixel = canvas.get_pixel_mut(x, y);
            for channel in 0..3 {
                let src = pixel.0[channel] as u16;
                let over = overlay.0[channel] as u16;
                pixel.0[channel] = ((src * (255 - alpha) + over * alpha) / 255) as u8;
            }
        }
    }
}
