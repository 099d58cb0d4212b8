// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Linepress.

use thiserror::Error;

/// Top-level error type for all Linepress operations.
#[derive(Debug, Error)]
pub enum LinepressError {
    // -- Compositor errors --
    #[error("failed to decode source image: {0}")]
    Decode(String),

    #[error("invalid input image: {0}")]
    InvalidInput(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Assembler errors --
    #[error("no pages supplied for assembly")]
    EmptyInput,

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Cover errors --
    #[error("font loading failed: {0}")]
    Font(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LinepressError>;
