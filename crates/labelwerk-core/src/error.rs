// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Labelwerk.
//
// Only configuration loading and artifact persistence reach callers. Font,
// barcode and field problems are absorbed by the renderer and degrade the
// label visually instead.

use thiserror::Error;

/// Top-level error type for all Labelwerk operations.
#[derive(Debug, Error)]
pub enum LabelError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Rendering internals (absorbed by fallbacks) --
    #[error("font unavailable: {0}")]
    Font(String),

    #[error("barcode generation failed: {0}")]
    Barcode(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Output / persistence --
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelError>;
