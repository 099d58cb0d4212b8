// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster primitives — source decoding, margin trim, canvas fit, PNG output.

pub mod encode;
pub mod source;

pub use source::SourceImage;
