// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text module — greedy column wrapping and the shrink-to-fit engine used by
// every text zone on the label.

pub mod fit;
pub mod wrap;

pub use fit::{FittedText, TextFitter};
pub use wrap::wrap_columns;
