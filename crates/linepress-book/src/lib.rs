// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// linepress-book — Page production for the Linepress coloring-book pipeline.
//
// Provides the page compositor (margin trim, canvas fit, edge binarization,
// line thickening), batch processing with per-file failure isolation, page
// selection and ordering, multi-page PDF assembly with exact physical
// geometry, PDF inspection, cover composition, and export manifests.

pub mod cover;
pub mod manifest;
pub mod page;
pub mod pdf;
pub mod raster;
pub mod select;

// Re-export the primary types so callers can use `linepress_book::PageCompositor` etc.
pub use cover::composer::CoverComposer;
pub use manifest::BookManifest;
pub use page::batch::{BatchReport, process_directory};
pub use page::compositor::PageCompositor;
pub use pdf::assembler::BookAssembler;
pub use pdf::inspect::BookInspector;
pub use raster::source::SourceImage;
pub use select::{PageOrder, select_pages};
