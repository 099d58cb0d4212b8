// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch page production with per-file failure isolation: one unreadable
// source must never abort the rest of the run, and every failure is
// reported with the offending path.

use std::path::{Path, PathBuf};

use linepress_core::error::{LinepressError, Result};
use linepress_core::human_errors::humanize_error;
use tracing::{info, instrument, warn};

use crate::page::compositor::PageCompositor;
use crate::raster::encode::write_png_gray;

/// File extensions accepted as source images (case-insensitive).
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// Whether a path carries a supported raster extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lowered = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lowered.as_str())
        })
}

/// One failed source in a batch run.
#[derive(Debug)]
pub struct BatchFailure {
    /// The source file that could not be processed.
    pub source: PathBuf,
    /// Why it failed.
    pub error: LinepressError,
}

/// Outcome of a batch run: which sources produced pages and which failed.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output paths of successfully composited pages, in input order.
    pub succeeded: Vec<PathBuf>,
    /// Failures, each naming its source.
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Total number of sources attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every source produced a page.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Render the failures as human-readable lines, one per source.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|failure| {
                let human = humanize_error(&failure.error);
                format!(
                    "{}: {} {}",
                    failure.source.display(),
                    human.message,
                    human.suggestion
                )
            })
            .collect()
    }
}

/// Composite every supported image in `input_dir` into `output_dir`.
///
/// Sources are processed in sorted name order. Each output is written as
/// `<stem>_page.png` at `dpi`, published atomically. Per-file failures are
/// collected into the report; only the directory listing itself can fail
/// the whole call.
#[instrument(skip_all, fields(
    input = %input_dir.as_ref().display(),
    output = %output_dir.as_ref().display(),
    dpi,
))]
pub fn process_directory(
    compositor: &PageCompositor,
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    dpi: u32,
) -> Result<BatchReport> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(input_dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    sources.sort();

    info!(count = sources.len(), "Batch run starting");

    let mut report = BatchReport::default();
    for source in sources {
        match compose_one(compositor, &source, output_dir, dpi) {
            Ok(written) => report.succeeded.push(written),
            Err(error) => {
                warn!(source = %source.display(), %error, "Source failed; continuing batch");
                report.failed.push(BatchFailure { source, error });
            }
        }
    }

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Batch run complete"
    );
    Ok(report)
}

/// Composite a single source file and write its page next to the others.
fn compose_one(
    compositor: &PageCompositor,
    source: &Path,
    output_dir: &Path,
    dpi: u32,
) -> Result<PathBuf> {
    let page = compositor.compose_path(source)?;

    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("page");
    let destination = output_dir.join(format!("{stem}_page.png"));

    write_png_gray(&destination, &page, dpi)?;
    Ok(destination)
}
