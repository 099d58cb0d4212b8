// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page production — the compositing pipeline and the batch runner.

pub mod batch;
pub mod compositor;

pub use batch::{BatchReport, process_directory};
pub use compositor::PageCompositor;
