// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk — Core types, error definitions, field normalisation and label
// counting shared by the renderer and the command-line front end.

pub mod config;
pub mod count;
pub mod error;
pub mod normalize;
pub mod types;

pub use config::{FontCandidates, MAX_CANVAS_PX, RenderConfig};
pub use count::{LabelJob, effective_case_size, final_labels, plan_copies};
pub use error::{LabelError, Result};
pub use normalize::{BracketSplit, NormalizedRecord, clean_optional, normalize, split_bracketed};
pub use types::*;
