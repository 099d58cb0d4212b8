// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export manifest — a descriptive record written alongside each assembled
// book. Nothing in the pipeline reads it back; it exists for humans, logs,
// and audit trails.

use std::path::Path;

use chrono::{DateTime, Utc};
use linepress_core::error::Result;
use linepress_core::types::{Bleed, PaperKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::raster::encode::write_atomic;

/// Record of one book export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookManifest {
    /// When the export finished.
    pub created_at: DateTime<Utc>,
    /// Paper kind the book was laid out for.
    pub paper: PaperKind,
    /// Declared resolution in samples per inch.
    pub dpi: u32,
    /// Bleed mode used for the page geometry.
    pub bleed: Bleed,
    /// Number of pages in the book.
    pub page_count: usize,
    /// File name of the produced PDF.
    pub output_pdf: String,
    /// SHA-256 of the PDF bytes, hex encoded.
    pub document_hash: String,
    /// Source image file names, in assembly order.
    pub images: Vec<String>,
}

impl BookManifest {
    /// Build a manifest for a finished export.
    pub fn new(
        paper: PaperKind,
        dpi: u32,
        bleed: Bleed,
        output_pdf: &Path,
        pdf_bytes: &[u8],
        sources: &[impl AsRef<Path>],
    ) -> Self {
        let document_hash = hex::encode(Sha256::digest(pdf_bytes));
        let images = sources
            .iter()
            .map(|source| file_name(source.as_ref()))
            .collect();

        Self {
            created_at: Utc::now(),
            paper,
            dpi,
            bleed,
            page_count: sources.len(),
            output_pdf: file_name(output_pdf),
            document_hash,
            images,
        }
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `path` as JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path.as_ref(), json.as_bytes())?;
        info!(
            path = %path.as_ref().display(),
            pages = self.page_count,
            "Manifest written"
        );
        Ok(())
    }
}

/// Last path component as a plain string.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
