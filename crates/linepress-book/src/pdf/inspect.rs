// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Book inspection — open a produced PDF and report its page count and
// physical page geometry using the `lopdf` crate. Backs the geometry
// checks in the assembler's tests and lets callers verify an export before
// shipping it to a print service.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use linepress_core::error::{LinepressError, Result};
use tracing::{debug, instrument};

/// Read-only view over an assembled book PDF.
#[derive(Debug)]
pub struct BookInspector {
    /// The underlying lopdf document.
    document: Document,
}

impl BookInspector {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            LinepressError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create an inspector from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LinepressError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Per-page media box sizes in points, in page order.
    ///
    /// The /MediaBox may live on the page itself or be inherited from an
    /// ancestor /Pages node, so each lookup walks the /Parent chain.
    pub fn page_sizes_pt(&self) -> Result<Vec<(f64, f64)>> {
        let pages = self.document.get_pages();
        let mut sizes = Vec::with_capacity(pages.len());

        for (&number, &page_id) in pages.iter() {
            let (llx, lly, urx, ury) =
                effective_media_box(&self.document, page_id).ok_or_else(|| {
                    LinepressError::Pdf(format!("page {} has no /MediaBox", number))
                })?;
            sizes.push((urx - llx, ury - lly));
        }

        Ok(sizes)
    }
}

/// Walk from a page up the /Parent chain looking for a /MediaBox.
fn effective_media_box(document: &Document, page_id: ObjectId) -> Option<(f64, f64, f64, f64)> {
    let mut current = document.get_object(page_id).ok()?.as_dict().ok()?;
    loop {
        if let Ok(Object::Array(values)) = current.get(b"MediaBox")
            && values.len() == 4
        {
            let llx = as_f64(&values[0])?;
            let lly = as_f64(&values[1])?;
            let urx = as_f64(&values[2])?;
            let ury = as_f64(&values[3])?;
            return Some((llx, lly, urx, ury));
        }

        match current.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                current = document.get_object(*parent_id).ok()?.as_dict().ok()?;
            }
            _ => return None,
        }
    }
}

/// Numeric PDF objects as f64.
fn as_f64(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let err = BookInspector::from_bytes(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, LinepressError::Pdf(_)));
    }

    #[test]
    fn as_f64_accepts_both_numeric_kinds() {
        assert_eq!(as_f64(&Object::Integer(612)), Some(612.0));
        assert_eq!(as_f64(&Object::Real(791.5)), Some(791.5));
        assert_eq!(as_f64(&Object::Null), None);
    }
}
