// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Book assembler — combine processed pages into one print-ready multi-page
// PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Each page embeds one raster image at the declared
// resolution so the physical page size equals `pixels / dpi` exactly.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use linepress_core::error::{LinepressError, Result};
use linepress_core::types::{Bleed, CanvasSize, PaperKind};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::raster::encode::write_atomic;
use crate::raster::source::SourceImage;

/// Assembles an ordered sequence of page images into one paginated PDF.
///
/// Every page is re-fitted through the same canvas-fit-and-center procedure
/// the compositor uses, so heterogeneous inputs still produce a uniform
/// book; in normal operation the pages arrive pre-sized and the fit is a
/// no-op.
pub struct BookAssembler {
    /// Physical paper kind.
    paper: PaperKind,
    /// Declared resolution in samples per inch.
    dpi: u32,
    /// Bleed mode applied to the page geometry.
    bleed: Bleed,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Explicit pixel geometry override; bypasses the paper table.
    page_size_override: Option<CanvasSize>,
}

impl BookAssembler {
    /// Create an assembler for the given paper kind and resolution, no bleed.
    pub fn new(paper: PaperKind, dpi: u32) -> Self {
        Self {
            paper,
            dpi,
            bleed: Bleed::None,
            title: None,
            page_size_override: None,
        }
    }

    /// Set the bleed mode.
    pub fn with_bleed(mut self, bleed: Bleed) -> Self {
        self.bleed = bleed;
        self
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Override the page pixel geometry instead of deriving it from the
    /// paper kind.
    pub fn with_page_size(mut self, size: CanvasSize) -> Self {
        self.page_size_override = Some(size);
        self
    }

    /// Final page geometry in pixels: the explicit override if set, otherwise
    /// the paper dimensions (plus bleed) at the configured resolution.
    pub fn page_pixels(&self) -> Result<CanvasSize> {
        match self.page_size_override {
            Some(size) => Ok(size),
            None => CanvasSize::for_print(self.paper, self.dpi, self.bleed),
        }
    }

    // -- Assembly -------------------------------------------------------------

    /// Read page images from disk, in the given order, and assemble them.
    ///
    /// Unlike batch compositing, a page that fails to decode here is fatal to
    /// the call: there is no partial book to salvage. The error names the
    /// offending file.
    #[instrument(skip(self, sources), fields(pages = sources.len(), paper = %self.paper, dpi = self.dpi))]
    pub fn assemble_files(&self, sources: &[impl AsRef<Path>]) -> Result<Vec<u8>> {
        if sources.is_empty() {
            return Err(LinepressError::EmptyInput);
        }

        let geometry = self.page_pixels()?;
        let mut fitted = Vec::with_capacity(sources.len());
        for source in sources {
            let page = SourceImage::open(source.as_ref())?.fit_canvas(geometry);
            fitted.push(page);
        }

        self.build_pdf(fitted, geometry)
    }

    /// Assemble already-decoded page images, in the given order.
    #[instrument(skip(self, images), fields(pages = images.len(), paper = %self.paper, dpi = self.dpi))]
    pub fn assemble_images(&self, images: Vec<DynamicImage>) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(LinepressError::EmptyInput);
        }

        let geometry = self.page_pixels()?;
        let fitted = images
            .into_iter()
            .map(|image| SourceImage::from_dynamic(image).fit_canvas(geometry))
            .collect();

        self.build_pdf(fitted, geometry)
    }

    /// Assemble and publish the PDF to `path` atomically.
    pub fn write_to_file(
        &self,
        sources: &[impl AsRef<Path>],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.assemble_files(sources)?;
        write_atomic(path.as_ref(), &bytes)?;
        info!("Wrote book PDF to {}", path.as_ref().display());
        Ok(())
    }

    // -- Internals ------------------------------------------------------------

    /// Serialise fitted pages into the final PDF.
    fn build_pdf(&self, pages: Vec<GrayImage>, geometry: CanvasSize) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Linepress Book");

        // Page size in printpdf units, derived from the pixel geometry so the
        // declared physical size is pixels / dpi inches per axis.
        let page_w = Mm(geometry.width as f32 / self.dpi as f32 * 25.4);
        let page_h = Mm(geometry.height as f32 / self.dpi as f32 * 25.4);

        info!(
            pages = pages.len(),
            geometry = %geometry,
            "Assembling book PDF"
        );

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for page in pages {
            let (width, height) = (page.width() as usize, page.height() as usize);
            let rgb = DynamicImage::ImageLuma8(page).to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width,
                height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Placed at the page origin with unit scale: at the declared DPI
            // the image spans the page exactly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(self.dpi as f32),
                    rotate: None,
                },
            }];

            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        debug!(pages = doc.pages.len(), "Page construction complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }
}
