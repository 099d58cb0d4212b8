// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection — choose and order the processed pages that go into a book.
// Shuffling is resolved here, once, before assembly ever starts; the
// assembler itself is strictly deterministic over the list it receives.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use linepress_core::error::Result;

use crate::page::batch::is_supported_image;

/// How pages are ordered in the assembled book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrder {
    /// Sorted by file name.
    Sequential,
    /// Shuffled once up front; a seed pins the permutation for reproducible
    /// builds, `None` draws from entropy.
    Shuffled { seed: Option<u64> },
}

/// List the supported images in `dir`, apply the requested order, and
/// optionally cap the count.
#[instrument(skip_all, fields(dir = %dir.as_ref().display(), order = ?order, count = ?count))]
pub fn select_pages(
    dir: impl AsRef<Path>,
    order: PageOrder,
    count: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    pages.sort();

    if let PageOrder::Shuffled { seed } = order {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        pages.shuffle(&mut rng);
    }

    if let Some(limit) = count {
        pages.truncate(limit);
    }

    debug!(selected = pages.len(), "Pages selected");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn seed_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let img = GrayImage::from_pixel(8, 8, Luma([255u8]));
        for name in names {
            img.save(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn sequential_order_is_sorted_by_name() {
        let dir = seed_dir(&["c.png", "a.png", "b.png"]);
        let pages = select_pages(dir.path(), PageOrder::Sequential, None).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let dir = seed_dir(&["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"]);
        let order = PageOrder::Shuffled { seed: Some(42) };

        let first = select_pages(dir.path(), order, None).unwrap();
        let second = select_pages(dir.path(), order, None).unwrap();
        assert_eq!(first, second);

        // Same multiset as the sequential listing.
        let mut sorted = first.clone();
        sorted.sort();
        let sequential = select_pages(dir.path(), PageOrder::Sequential, None).unwrap();
        assert_eq!(sorted, sequential);
    }

    #[test]
    fn count_limits_the_selection() {
        let dir = seed_dir(&["a.png", "b.png", "c.png"]);
        let pages = select_pages(dir.path(), PageOrder::Sequential, Some(2)).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn empty_directory_selects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pages = select_pages(dir.path(), PageOrder::Sequential, None).unwrap();
        assert!(pages.is_empty());
    }
}
