// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placeholder bar pattern drawn when no backend can produce a barcode.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const BAR_COUNT: u32 = 42;

/// Evenly spaced vertical bars inside a thin border, exactly
/// `width` x `height` (each at least one pixel). Not scannable.
pub fn placeholder_bars(width: u32, height: u32) -> GrayImage {
    let (width, height) = (width.max(1), height.max(1));
    let mut image = GrayImage::from_pixel(width, height, Luma([255]));
    let black = Luma([0u8]);

    let bar_width = (width / (BAR_COUNT * 2)).max(2);
    let gap = (width.saturating_sub(BAR_COUNT * bar_width) / (BAR_COUNT + 1)).max(1);
    let top = (f64::from(height) * 0.05) as u32;
    let bottom = (f64::from(height) * 0.95) as u32;

    if bottom > top {
        let mut x = gap;
        for _ in 0..BAR_COUNT {
            if x + bar_width > width {
                break;
            }
            draw_filled_rect_mut(
                &mut image,
                Rect::at(x as i32, top as i32).of_size(bar_width, bottom - top),
                black,
            );
            x += bar_width + gap;
        }
    }

    let border = ((f64::from(height) * 0.04).round() as u32).max(1);
    let side = border.min(width);
    let edge = border.min(height);
    draw_filled_rect_mut(&mut image, Rect::at(0, 0).of_size(width, edge), black);
    draw_filled_rect_mut(
        &mut image,
        Rect::at(0, (height - edge) as i32).of_size(width, edge),
        black,
    );
    draw_filled_rect_mut(&mut image, Rect::at(0, 0).of_size(side, height), black);
    draw_filled_rect_mut(
        &mut image,
        Rect::at((width - side) as i32, 0).of_size(side, height),
        black,
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_requested_size() {
        for (w, h) in [(1, 1), (7, 3), (320, 90), (944, 181)] {
            let image = placeholder_bars(w, h);
            assert_eq!((image.width(), image.height()), (w, h));
        }
        let image = placeholder_bars(0, 0);
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(placeholder_bars(500, 120).as_raw(), placeholder_bars(500, 120).as_raw());
    }

    #[test]
    fn has_border_and_forty_two_bars() {
        let image = placeholder_bars(840, 100);
        // Border rows and columns are solid.
        assert!((0..840).all(|x| image.get_pixel(x, 0).0[0] == 0));
        assert!((0..100).all(|y| image.get_pixel(839, y).0[0] == 0));

        // Count dark runs along the middle row, excluding the border columns.
        let border = 4;
        let mut runs = 0;
        let mut in_bar = false;
        for x in border..840 - border {
            let dark = image.get_pixel(x, 50).0[0] == 0;
            if dark && !in_bar {
                runs += 1;
            }
            in_bar = dark;
        }
        assert_eq!(runs, 42);
    }
}
