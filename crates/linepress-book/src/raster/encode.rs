// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PNG output with resolution metadata.
//
// The `image` crate's PNG encoder does not expose the pHYs chunk, so pages
// are encoded through the `png` crate directly: the declared pixel density
// must match the caller-supplied DPI for the printed size to come out right.
// Files are published via write-to-temp-then-rename so an interrupted run
// never leaves a partial file that looks valid.

use std::ffi::OsString;
use std::path::Path;

use image::{GrayImage, RgbImage};
use linepress_core::error::{LinepressError, Result};
use tracing::{debug, instrument};

/// pHYs pixel density for `dpi` samples per inch (PNG stores pixels per metre).
fn pixel_dims(dpi: u32) -> png::PixelDimensions {
    let ppm = (dpi as f64 / 0.0254).round() as u32;
    png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }
}

fn encode(
    data: &[u8],
    width: u32,
    height: u32,
    color: png::ColorType,
    dpi: u32,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = png::Encoder::new(&mut buffer, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(pixel_dims(dpi)));

    let mut writer = encoder
        .write_header()
        .map_err(|err| LinepressError::Image(format!("PNG header write failed: {}", err)))?;
    writer
        .write_image_data(data)
        .map_err(|err| LinepressError::Image(format!("PNG encoding failed: {}", err)))?;
    writer
        .finish()
        .map_err(|err| LinepressError::Image(format!("PNG finish failed: {}", err)))?;

    Ok(buffer)
}

/// Encode a single-channel image as PNG bytes carrying `dpi` metadata.
pub fn png_bytes_gray(image: &GrayImage, dpi: u32) -> Result<Vec<u8>> {
    encode(
        image.as_raw(),
        image.width(),
        image.height(),
        png::ColorType::Grayscale,
        dpi,
    )
}

/// Encode an RGB image as PNG bytes carrying `dpi` metadata.
pub fn png_bytes_rgb(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    encode(
        image.as_raw(),
        image.width(),
        image.height(),
        png::ColorType::Rgb,
        dpi,
    )
}

/// Write `bytes` to `path` atomically: the data lands in a sibling temp file
/// first and is renamed into place only once fully written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), bytes_len = bytes.len()))]
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    debug!("File published");
    Ok(())
}

/// Encode a single-channel image and write it to `path` atomically.
pub fn write_png_gray(path: impl AsRef<Path>, image: &GrayImage, dpi: u32) -> Result<()> {
    let bytes = png_bytes_gray(image, dpi)?;
    write_atomic(path, &bytes)
}

/// Encode an RGB image and write it to `path` atomically.
pub fn write_png_rgb(path: impl AsRef<Path>, image: &RgbImage, dpi: u32) -> Result<()> {
    let bytes = png_bytes_rgb(image, dpi)?;
    write_atomic(path, &bytes)
}
