// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shrink-to-fit text engine.
//
// The wrap column is estimated from one reference glyph, then every candidate
// line is measured for real. Sizes shrink geometrically until the text fits in
// two lines inside the width budget; if it never does, the words are split
// into two balanced halves at the last size tried.

use tracing::{debug, instrument, warn};

use crate::fonts::TextMeasure;
use crate::text::wrap::wrap_columns;

/// Multiplier applied to the size after each rejected attempt.
pub const SHRINK_FACTOR: f32 = 0.88;
/// Upper bound on shrink steps.
pub const MAX_SHRINK_ATTEMPTS: u32 = 14;
/// Sizes never go below this many pixels.
pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_LINES: usize = 2;
/// Floor for the reference-glyph width estimate.
const MIN_GLYPH_WIDTH: u32 = 6;

/// Lines ready to draw plus the pixel size they were laid out at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub font_size: u32,
    /// Set when the balanced two-line split was used.
    pub forced_split: bool,
}

impl FittedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Width budget and sizing policy for one text zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFitter {
    pub max_width: u32,
    pub initial_size: u32,
    /// Glyph whose width stands in for the average character.
    pub reference_glyph: char,
    /// Floor on the estimated wrap column.
    pub min_columns: usize,
    pub min_size: u32,
    pub max_attempts: u32,
}

impl TextFitter {
    pub fn new(max_width: u32, initial_size: u32) -> Self {
        Self {
            max_width,
            initial_size,
            reference_glyph: 'A',
            min_columns: 4,
            min_size: MIN_FONT_SIZE,
            max_attempts: MAX_SHRINK_ATTEMPTS,
        }
    }

    pub fn with_reference_glyph(mut self, glyph: char) -> Self {
        self.reference_glyph = glyph;
        self
    }

    pub fn with_min_columns(mut self, columns: usize) -> Self {
        self.min_columns = columns;
        self
    }

    /// Wrap at `size` using the glyph-width column estimate. No shrinking and
    /// no line limit.
    pub fn wrap_at(&self, measure: &impl TextMeasure, text: &str, size: u32) -> Vec<String> {
        let mut glyph = [0u8; 4];
        let reference = self.reference_glyph.encode_utf8(&mut glyph);
        let glyph_width = measure.text_width(reference, size).max(MIN_GLYPH_WIDTH);
        let columns = ((self.max_width / glyph_width) as usize).max(self.min_columns);
        wrap_columns(text, columns)
    }

    fn fits(&self, measure: &impl TextMeasure, lines: &[String], size: u32) -> bool {
        lines.len() <= MAX_LINES
            && lines
                .iter()
                .all(|line| measure.text_width(line, size) <= self.max_width)
    }

    /// Fit `text` into at most two lines within `max_width`.
    #[instrument(skip(self, measure), fields(max_width = self.max_width, initial = self.initial_size))]
    pub fn fit(&self, measure: &impl TextMeasure, text: &str) -> FittedText {
        let mut size = self.initial_size.max(1);
        let mut lines = self.wrap_at(measure, text, size);

        if self.fits(measure, &lines, size) {
            return FittedText {
                lines,
                font_size: size,
                forced_split: false,
            };
        }

        // Never grow: a start below the floor stays where it is.
        let floor = self.min_size.min(size);
        let mut attempts = 0;
        while !self.fits(measure, &lines, size) && attempts < self.max_attempts {
            let next = ((size as f32 * SHRINK_FACTOR) as u32).max(floor);
            if next == size {
                break;
            }
            size = next;
            lines = self.wrap_at(measure, text, size);
            attempts += 1;
        }
        debug!(size, attempts, lines = lines.len(), "Shrink loop finished");

        let forced_split = lines.len() > MAX_LINES;
        if forced_split {
            warn!(size, lines = lines.len(), "Text still too long; forcing a balanced two-line split");
            lines = balanced_split(text);
        }

        FittedText {
            lines,
            font_size: size,
            forced_split,
        }
    }
}

/// Split text into two halves at the word midpoint. A single word is split at
/// its character midpoint instead.
fn balanced_split(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.len() {
        0 => Vec::new(),
        1 => {
            let chars: Vec<char> = words[0].chars().collect();
            if chars.len() < 2 {
                return vec![words[0].to_string()];
            }
            let (head, tail) = chars.split_at(chars.len() / 2);
            vec![head.iter().collect(), tail.iter().collect()]
        }
        n => {
            let mid = (n / 2).max(1);
            vec![words[..mid].join(" "), words[mid..].join(" ")]
        }
    }
}
