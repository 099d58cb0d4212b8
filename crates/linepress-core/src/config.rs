// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Book pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LinepressError, Result};
use crate::types::{Bleed, PaperKind};

/// Default binarization threshold (0–255).
pub const DEFAULT_THRESHOLD: u8 = 160;
/// Default line-thickening radius in pixels.
pub const DEFAULT_THICKEN_RADIUS: u8 = 2;
/// Default output resolution in samples per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Settings for one book production run.
///
/// The pipeline components take explicit values at construction time; there
/// is no ambient lookup. This struct is the single place a caller gathers
/// those values, with the defaults the original tooling shipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Physical page kind for the assembled book.
    pub paper: PaperKind,
    /// Resolution in samples per inch, used for page geometry and metadata.
    pub dpi: u32,
    /// Bleed mode applied to the page geometry.
    pub bleed: Bleed,
    /// Binarization threshold for the line-art step.
    pub threshold: u8,
    /// Line-thickening radius in pixels (0 disables thickening).
    pub thicken_radius: u8,
    /// Auto-trim white margins before canvas fitting.
    pub trim_margins: bool,
    /// Shuffle page order before assembly.
    pub shuffle: bool,
    /// Minimum accepted page count for a book.
    pub min_pages: usize,
    /// Maximum accepted page count for a book.
    pub max_pages: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            paper: PaperKind::Letter,
            dpi: DEFAULT_DPI,
            bleed: Bleed::None,
            threshold: DEFAULT_THRESHOLD,
            thicken_radius: DEFAULT_THICKEN_RADIUS,
            trim_margins: false,
            shuffle: false,
            min_pages: 30,
            max_pages: 120,
        }
    }
}

impl BookConfig {
    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(LinepressError::InvalidParameter(
                "dpi must be positive".into(),
            ));
        }
        if self.min_pages > self.max_pages {
            return Err(LinepressError::InvalidParameter(format!(
                "min_pages ({}) exceeds max_pages ({})",
                self.min_pages, self.max_pages
            )));
        }
        Ok(())
    }

    /// Enforce the book-length policy on a prospective page count.
    ///
    /// This is a publishing rule, not a format rule; the assembler itself
    /// accepts any non-empty page list. Callers apply this check before
    /// assembly.
    pub fn check_page_count(&self, count: usize) -> Result<()> {
        if count < self.min_pages || count > self.max_pages {
            return Err(LinepressError::InvalidParameter(format!(
                "page count must be between {} and {}; got {}",
                self.min_pages, self.max_pages, count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tooling() {
        let config = BookConfig::default();
        assert_eq!(config.paper, PaperKind::Letter);
        assert_eq!(config.dpi, 300);
        assert_eq!(config.threshold, 160);
        assert_eq!(config.thicken_radius, 2);
        assert!(!config.trim_margins);
        config.validate().unwrap();
    }

    #[test]
    fn page_count_policy() {
        let config = BookConfig::default();
        assert!(config.check_page_count(29).is_err());
        assert!(config.check_page_count(30).is_ok());
        assert!(config.check_page_count(120).is_ok());
        assert!(config.check_page_count(121).is_err());
    }

    #[test]
    fn inverted_page_bounds_fail_validation() {
        let config = BookConfig {
            min_pages: 50,
            max_pages: 10,
            ..BookConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
