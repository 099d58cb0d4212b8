// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover module — front-cover composition with text overlay.

pub mod composer;

pub use composer::{Backdrop, CoverComposer};
