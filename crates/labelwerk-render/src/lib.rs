// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwerk-render — Turns one label record into a print-ready square raster.
//
// Provides font resolution with a built-in fallback face, the auto-fit text
// engine, a ranked barcode provider that degrades to a placeholder, the
// five-zone canvas composer, PNG persistence with embedded DPI, and a
// parallel batch runner.

pub mod barcode;
pub mod batch;
pub mod canvas;
pub mod fonts;
pub mod output;
pub mod text;

// Re-export the primary structs so callers can use `labelwerk_render::LabelRenderer` etc.
pub use barcode::{BarcodeBitmap, BarcodeProvider, BarcodeSource};
pub use batch::{BatchFailure, BatchReport, SavedLabel, render_batch};
pub use canvas::composer::{LabelLayout, LabelRenderer, RenderedLabel, ZonePlacement, render};
pub use canvas::geometry::{LabelGeometry, canvas_pixels};
pub use fonts::{FontBook, FontFace, TextMeasure};
pub use output::{clear_label_files, encode_png, list_label_files, save};
pub use text::fit::{FittedText, TextFitter};
