// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vector backend — bars are emitted as rectangles in module space and scaled
// straight to the target box, so no intermediate bitmap is resampled.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use labelwerk_core::BackendKind;
use labelwerk_core::error::Result;

use super::symbology::encode_code128;
use super::{BAR_HEIGHT_MODULES, BarcodeBackend, fit_within};

#[derive(Debug, Clone, Copy, Default)]
pub struct VectorBackend;

impl BarcodeBackend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    fn render(&self, value: &str, target_width: u32, target_height: u32) -> Result<GrayImage> {
        let row = encode_code128(value)?;
        let (width, height, scale) = fit_within(
            row.len() as u32,
            BAR_HEIGHT_MODULES,
            target_width.max(1),
            target_height.max(1),
        );

        let mut image = GrayImage::from_pixel(width, height, Luma([255]));
        for (start, run) in row.bars() {
            // Edges are snapped independently so adjacent bars never overlap.
            let left = (start as f64 * scale).round() as u32;
            let right = (((start + run) as f64 * scale).round() as u32).min(width);
            if right > left {
                draw_filled_rect_mut(
                    &mut image,
                    Rect::at(left as i32, 0).of_size(right - left, height),
                    Luma([0]),
                );
            }
        }
        Ok(image)
    }
}
