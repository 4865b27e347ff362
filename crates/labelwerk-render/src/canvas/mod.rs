// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas module — pixel geometry of the label template and the composer that
// draws the five zones onto it.

pub mod composer;
pub mod geometry;

pub use composer::{LabelLayout, LabelRenderer, RenderedLabel, ZonePlacement, render};
pub use geometry::{LabelGeometry, MIN_CANVAS_PX, canvas_pixels};
