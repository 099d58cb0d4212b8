// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Linepress page pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LinepressError, Result};

/// Physical paper kinds supported for book export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperKind {
    /// US Letter, 8.5 × 11 inches.
    Letter,
    /// ISO A4, 8.27 × 11.69 inches.
    A4,
}

impl PaperKind {
    /// Dimensions in inches (width, height).
    pub fn dimensions_in(&self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::A4 => (8.27, 11.69),
        }
    }

    /// Keyword used in file names and manifests.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::A4 => "a4",
        }
    }
}

impl fmt::Display for PaperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for PaperKind {
    type Err = LinepressError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            other => Err(LinepressError::InvalidParameter(format!(
                "paper must be 'letter' or 'a4', got '{other}'"
            ))),
        }
    }
}

/// Bleed mode: an optional physical margin added symmetrically to every page
/// edge so a print service can trim without cutting into content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bleed {
    None,
    /// 3 millimetres per side (0.11811 inches).
    Mm3,
}

impl Bleed {
    /// Bleed amount per side, in inches.
    pub fn per_side_in(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Mm3 => 0.11811,
        }
    }

    /// Keyword used in file names and manifests.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mm3 => "3mm",
        }
    }
}

impl fmt::Display for Bleed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Bleed {
    type Err = LinepressError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "3mm" => Ok(Self::Mm3),
            other => Err(LinepressError::InvalidParameter(format!(
                "bleed must be 'none' or '3mm', got '{other}'"
            ))),
        }
    }
}

/// Target canvas geometry in pixels.
///
/// Dimensions are always strictly positive; the constructor rejects zero so
/// downstream fit arithmetic never divides by nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Create a canvas size, rejecting degenerate dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LinepressError::InvalidParameter(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width / height ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Pixel geometry for a physical page.
    ///
    /// Looks up the paper dimensions, adds twice the per-side bleed when
    /// requested, and converts to pixels at `dpi` samples per inch. Each axis
    /// is rounded independently with ties away from zero (`f64::round`);
    /// this tie-break is part of the geometry contract.
    pub fn for_print(paper: PaperKind, dpi: u32, bleed: Bleed) -> Result<Self> {
        if dpi == 0 {
            return Err(LinepressError::InvalidParameter(
                "resolution must be a positive number of samples per inch".into(),
            ));
        }

        let (mut width_in, mut height_in) = paper.dimensions_in();
        let bleed_in = bleed.per_side_in();
        width_in += 2.0 * bleed_in;
        height_in += 2.0 * bleed_in;

        Self::new(
            (width_in * dpi as f64).round() as u32,
            (height_in * dpi as f64).round() as u32,
        )
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for CanvasSize {
    type Err = LinepressError;

    /// Parse a `"WxH"` string such as `"2550x3300"`.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_ascii_lowercase();
        let (w, h) = lowered.split_once('x').ok_or_else(|| {
            LinepressError::InvalidParameter(format!("expected WxH, got '{s}'"))
        })?;
        let width: u32 = w.trim().parse().map_err(|_| {
            LinepressError::InvalidParameter(format!("bad canvas width '{w}'"))
        })?;
        let height: u32 = h.trim().parse().map_err(|_| {
            LinepressError::InvalidParameter(format!("bad canvas height '{h}'"))
        })?;
        Self::new(width, height)
    }
}
