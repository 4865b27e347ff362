// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label geometry — every pixel measurement of the template, derived from the
// canvas side length alone.

use labelwerk_core::{MAX_CANVAS_PX, RenderConfig};

/// Smallest canvas ever produced, in pixels.
pub const MIN_CANVAS_PX: u32 = 200;

const CM_PER_INCH: f64 = 2.54;

/// Square canvas side in pixels: `max(200, round(side_cm / 2.54 * dpi))`,
/// clamped to [`MAX_CANVAS_PX`].
pub fn canvas_pixels(side_cm: f32, dpi: u32) -> u32 {
    let exact = f64::from(side_cm) / CM_PER_INCH * f64::from(dpi);
    if !exact.is_finite() || exact <= f64::from(MIN_CANVAS_PX) {
        return MIN_CANVAS_PX;
    }
    if exact >= f64::from(MAX_CANVAS_PX) {
        return MAX_CANVAS_PX;
    }
    (exact.round() as u32).max(MIN_CANVAS_PX)
}

/// Pixel layout for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelGeometry {
    pub side_px: u32,
    /// Top padding; the cursor starts here.
    pub padding: u32,
    /// Width budget shared by the text zones.
    pub text_width: u32,
    pub line_gap: u32,

    pub product_size: u32,
    pub flavour_size: u32,
    pub strength_size: u32,
    pub identifier_size: u32,

    pub underline_thickness: u32,
    /// Space below the product underline.
    pub after_product: u32,
    /// Cursor advance when there is no product text.
    pub empty_product_gap: u32,
    pub after_flavour: u32,
    pub after_strength: u32,

    /// Height reserved for the barcode near the bottom edge.
    pub barcode_zone_height: u32,
    pub barcode_max_width: u32,
    pub barcode_max_height: u32,
    /// Top of the barcode zone.
    pub barcode_top: u32,
    /// Gap between the identifier text and the bottom edge.
    pub bottom_margin: u32,
}

fn fraction(px: u32, factor: f64) -> u32 {
    (f64::from(px) * factor) as u32
}

impl LabelGeometry {
    pub fn for_side(side_px: u32) -> Self {
        let px = side_px;
        let barcode_zone_height = fraction(px, 0.22);
        let bottom_margin = fraction(px, 0.02);
        Self {
            side_px: px,
            padding: fraction(px, 0.04),
            text_width: fraction(px, 0.90),
            line_gap: fraction(px, 0.008),

            product_size: fraction(px, 0.06).max(12),
            flavour_size: fraction(px, 0.12).max(22),
            strength_size: fraction(px, 0.09).max(14),
            identifier_size: fraction(px, 0.06).max(12),

            underline_thickness: fraction(px, 0.005).max(1),
            after_product: fraction(px, 0.03),
            empty_product_gap: fraction(px, 0.02),
            after_flavour: fraction(px, 0.01),
            after_strength: fraction(px, 0.02),

            barcode_zone_height,
            barcode_max_width: fraction(px, 0.80),
            barcode_max_height: (f64::from(barcode_zone_height) * 0.7) as u32,
            barcode_top: px.saturating_sub(barcode_zone_height + bottom_margin),
            bottom_margin,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::for_side(canvas_pixels(config.label_side_cm, config.dpi))
    }

    /// Left edge that centres `width` on the canvas.
    pub fn centred_x(&self, width: u32) -> i32 {
        (i64::from(self.side_px) - i64::from(width)) as i32 / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_centimetres_at_common_resolutions() {
        assert_eq!(canvas_pixels(10.0, 300), 1181);
        assert_eq!(canvas_pixels(10.0, 600), 2362);
        assert_eq!(canvas_pixels(2.54, 100), 200);
    }

    #[test]
    fn scales_linearly_with_dpi() {
        for dpi in [150u32, 203, 300, 406] {
            let single = canvas_pixels(10.0, dpi) as i64;
            let double = canvas_pixels(10.0, dpi * 2) as i64;
            assert!((double - 2 * single).abs() <= 1, "{dpi}");
        }
    }

    #[test]
    fn tiny_labels_hit_the_floor() {
        assert_eq!(canvas_pixels(0.5, 72), MIN_CANVAS_PX);
        assert_eq!(canvas_pixels(1.0, 1), MIN_CANVAS_PX);
        assert_eq!(canvas_pixels(f32::NAN, 300), MIN_CANVAS_PX);
    }

    #[test]
    fn huge_labels_hit_the_ceiling() {
        assert_eq!(canvas_pixels(100_000.0, 100_000), MAX_CANVAS_PX);
        assert_eq!(canvas_pixels(f32::MAX, u32::MAX), MAX_CANVAS_PX);
        assert_eq!(canvas_pixels(50.8, 1000), MAX_CANVAS_PX);
    }

    #[test]
    fn geometry_for_a_standard_label() {
        let g = LabelGeometry::for_side(1181);
        assert_eq!(g.padding, 47);
        assert_eq!(g.text_width, 1062);
        assert_eq!(g.flavour_size, 141);
        assert_eq!(g.product_size, 70);
        assert_eq!(g.strength_size, 106);
        assert_eq!(g.barcode_zone_height, 259);
        assert_eq!(g.barcode_max_width, 944);
        assert_eq!(g.barcode_max_height, 181);
        assert_eq!(g.barcode_top, 1181 - 259 - 23);
    }

    #[test]
    fn font_floors_apply_on_small_canvases() {
        let g = LabelGeometry::for_side(MIN_CANVAS_PX);
        assert_eq!(g.product_size, 12);
        assert_eq!(g.flavour_size, 24);
        assert_eq!(g.strength_size, 18);
        assert_eq!(g.identifier_size, 12);
        assert_eq!(g.underline_thickness, 1);
    }

    #[test]
    fn centring() {
        let g = LabelGeometry::for_side(1000);
        assert_eq!(g.centred_x(400), 300);
        assert_eq!(g.centred_x(1200), -100);
    }
}
