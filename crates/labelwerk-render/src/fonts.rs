// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution and metrics. Outline fonts come from the ranked candidate
// lists in the render configuration; when none of them load, a built-in mono
// bitmap face is used so a label can always be drawn.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use embedded_graphics::mono_font::ascii::{FONT_9X18_BOLD, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use labelwerk_core::FontCandidates;
use labelwerk_core::error::{LabelError, Result};
use tracing::{debug, info, instrument, warn};

/// Pixel metrics a text layout needs. Sizes are pixel heights.
pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn text_width(&self, text: &str, size: u32) -> u32;

    /// Vertical advance of one line.
    fn line_height(&self, size: u32) -> u32;
}

/// Which built-in bitmap face to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFace {
    Regular,
    Bold,
}

impl BuiltinFace {
    fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Self::Regular => &FONT_10X20,
            Self::Bold => &FONT_9X18_BOLD,
        }
    }
}

/// A resolved, drawable font face.
#[derive(Clone)]
pub enum FontFace {
    Outline { font: FontArc, source: PathBuf },
    Builtin(BuiltinFace),
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outline { source, .. } => f
                .debug_struct("Outline")
                .field("source", source)
                .finish(),
            Self::Builtin(face) => f.debug_tuple("Builtin").field(face).finish(),
        }
    }
}

impl FontFace {
    /// Load an outline font file (TrueType / OpenType).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|err| LabelError::Font(format!("{}: {}", path.display(), err)))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|err| LabelError::Font(format!("{}: {}", path.display(), err)))?;
        Ok(Self::Outline {
            font,
            source: path.to_path_buf(),
        })
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Draw `text` with its top-left corner at (`x`, `y`) in black.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, size: u32, text: &str) {
        if text.is_empty() || size == 0 {
            return;
        }
        match self {
            Self::Outline { font, .. } => {
                draw_text_mut(canvas, Rgb([0, 0, 0]), x, y, px_scale(size), font, text);
            }
            Self::Builtin(face) => draw_builtin(canvas, face.mono(), x, y, size, text),
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, size: u32) -> u32 {
        if text.is_empty() {
            return 0;
        }
        match self {
            Self::Outline { font, .. } => text_size(px_scale(size), font, text).0,
            Self::Builtin(face) => builtin_width(face.mono(), text, size),
        }
    }

    fn line_height(&self, size: u32) -> u32 {
        match self {
            Self::Outline { font, .. } => font.as_scaled(px_scale(size)).height().ceil() as u32,
            Self::Builtin(_) => size,
        }
    }
}

fn px_scale(size: u32) -> PxScale {
    PxScale::from(size as f32)
}

// -- Built-in face --------------------------------------------------------------

fn builtin_factor(font: &MonoFont<'_>, size: u32) -> f32 {
    size as f32 / font.character_size.height.max(1) as f32
}

fn builtin_advance(font: &MonoFont<'_>) -> u32 {
    font.character_size.width + font.character_spacing
}

fn builtin_width(font: &MonoFont<'_>, text: &str, size: u32) -> u32 {
    let native = text.chars().count() as u32 * builtin_advance(font);
    (native as f32 * builtin_factor(font, size)).round() as u32
}

/// One-bit render target for the mono face, later scaled onto the canvas.
struct GlyphMask {
    image: GrayImage,
}

impl GlyphMask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width.max(1), height.max(1)),
        }
    }
}

impl OriginDimensions for GlyphMask {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for GlyphMask {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color != BinaryColor::On || point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.image.width() && y < self.image.height() {
                self.image.put_pixel(x, y, Luma([255]));
            }
        }
        Ok(())
    }
}

fn draw_builtin(canvas: &mut RgbImage, font: &MonoFont<'_>, x: i32, y: i32, size: u32, text: &str) {
    let chars = text.chars().count() as u32;
    let mut mask = GlyphMask::new(chars * builtin_advance(font), font.character_size.height);
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut mask);

    let width = builtin_width(font, text, size).max(1);
    let scaled = imageops::resize(&mask.image, width, size.max(1), FilterType::Nearest);

    for (dx, dy, pixel) in scaled.enumerate_pixels() {
        if pixel.0[0] < 128 {
            continue;
        }
        let (px, py) = (x + dx as i32, y + dy as i32);
        if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
            canvas.put_pixel(px as u32, py as u32, Rgb([0, 0, 0]));
        }
    }
}

// -- Resolution -------------------------------------------------------------------

/// The regular and bold faces resolved once from a candidate list.
#[derive(Debug, Clone)]
pub struct FontBook {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl FontBook {
    /// Resolve both faces. Bold tries the bold list, then the regular list,
    /// then the built-in bold face. Never fails.
    #[instrument(skip_all, fields(regular = candidates.regular.len(), bold = candidates.bold.len()))]
    pub fn resolve(candidates: &FontCandidates) -> Self {
        let regular = first_loadable(&candidates.regular);
        let bold = first_loadable(&candidates.bold).or_else(|| regular.clone());

        let book = Self {
            regular: regular.unwrap_or(FontFace::Builtin(BuiltinFace::Regular)),
            bold: bold.unwrap_or(FontFace::Builtin(BuiltinFace::Bold)),
        };
        if book.regular.is_builtin() || book.bold.is_builtin() {
            warn!("No outline font could be loaded; using the built-in bitmap face");
        }
        info!(regular = ?book.regular, bold = ?book.bold, "Fonts resolved");
        book
    }

    /// Both faces built-in. Rendering with it does not touch the filesystem.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::Builtin(BuiltinFace::Regular),
            bold: FontFace::Builtin(BuiltinFace::Bold),
        }
    }
}

fn first_loadable(paths: &[PathBuf]) -> Option<FontFace> {
    paths.iter().find_map(|path| match FontFace::from_file(path) {
        Ok(face) => Some(face),
        Err(err) => {
            debug!(error = %err, "Font candidate rejected");
            None
        }
    })
}
