// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the linepress-book crate. Currently benchmarks
// the full page compositing pipeline on a small synthetic test image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use linepress_book::{PageCompositor, SourceImage};
use linepress_core::CanvasSize;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the compose pipeline on a 100x100 synthetic grayscale image.
///
/// Builds a light image with a dark rectangle (the same pattern used in the
/// compositor unit tests) and runs normalization, canvas fit, edge
/// binarization, and thickening at the stock settings onto a 255x330 canvas
/// -- the letter-at-30-DPI geometry, so the resample cost is representative
/// without a multi-megapixel fixture.
fn bench_compose(c: &mut Criterion) {
    let (width, height) = (100u32, 100u32);
    let mut img = GrayImage::from_pixel(width, height, Luma([240u8]));
    for y in 15..85 {
        for x in 15..85 {
            img.put_pixel(x, y, Luma([25u8]));
        }
    }
    let dynamic = DynamicImage::ImageLuma8(img);

    let compositor = PageCompositor::new(CanvasSize::new(255, 330).expect("valid canvas"));

    c.bench_function("compose (100x100 -> 255x330)", |b| {
        b.iter(|| {
            let source = SourceImage::from_dynamic(black_box(dynamic.clone()));
            let page = compositor.compose(source).expect("compose succeeds");
            black_box(page);
        });
    });
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
