// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas composer — draws one normalised record onto a white square canvas.
//
// Zones are laid out top to bottom: product (wrapped, underlined), flavour
// (auto-fit, bold), strength, then the barcode and identifier anchored to the
// bottom edge. The only state carried between zones is the vertical cursor,
// passed in and returned by each zone function.

use image::imageops;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use labelwerk_core::error::Result;
use labelwerk_core::{LabelRecord, NormalizedRecord, RenderConfig, Zone};
use tracing::{debug, instrument, warn};

use crate::barcode::{BarcodeProvider, BarcodeSource};
use crate::canvas::geometry::LabelGeometry;
use crate::fonts::{FontBook, FontFace, TextMeasure};
use crate::output;
use crate::text::fit::{FittedText, TextFitter};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Product lines wrap on the width of a lowercase glyph with at least this
/// many columns.
const PRODUCT_MIN_COLUMNS: usize = 10;

/// Vertical extent of one drawn zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePlacement {
    pub zone: Zone,
    pub top: u32,
    /// Exclusive.
    pub bottom: u32,
}

/// What was drawn, for callers that want to inspect a label without
/// decoding pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub product_lines: Vec<String>,
    pub flavour: FittedText,
    pub strength: String,
    pub barcode: BarcodeSource,
    /// Zones that were drawn, in drawing order. Empty zones are absent.
    pub zones: Vec<ZonePlacement>,
}

/// A finished label, held in memory until the caller saves it.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub image: RgbImage,
    pub side_px: u32,
    pub dpi: u32,
    /// Text printed in the identifier zone.
    pub identifier: String,
    pub layout: LabelLayout,
}

impl RenderedLabel {
    /// PNG bytes with the label's DPI embedded.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        output::encode_png(&self.image, self.dpi, &mut bytes)?;
        Ok(bytes)
    }
}

/// Renders records against one configuration. Fonts and barcode backends are
/// resolved once at construction; `render` takes `&self` and can be shared
/// across threads.
#[derive(Debug)]
pub struct LabelRenderer {
    config: RenderConfig,
    geometry: LabelGeometry,
    fonts: FontBook,
    barcodes: BarcodeProvider,
}

impl LabelRenderer {
    // -- Construction ---------------------------------------------------------

    #[instrument(skip_all, fields(side_cm = config.label_side_cm, dpi = config.dpi))]
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let fonts = FontBook::resolve(&config.fonts);
        let barcodes = BarcodeProvider::from_config(&config);
        Ok(Self::with_parts(config, fonts, barcodes))
    }

    /// Assemble a renderer from already-resolved parts.
    pub fn with_parts(config: RenderConfig, fonts: FontBook, barcodes: BarcodeProvider) -> Self {
        let geometry = LabelGeometry::from_config(&config);
        Self {
            config,
            geometry,
            fonts,
            barcodes,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn geometry(&self) -> &LabelGeometry {
        &self.geometry
    }

    // -- Rendering ------------------------------------------------------------

    /// Draw one record. Never fails: missing fonts, barcodes and fields all
    /// degrade visually.
    #[instrument(skip_all, fields(identifier = record.identifier.as_deref().unwrap_or("")))]
    pub fn render(&self, record: &LabelRecord) -> RenderedLabel {
        let fields = record.normalized();
        let side = self.geometry.side_px;
        let mut canvas = RgbImage::from_pixel(side, side, WHITE);
        let mut zones = Vec::with_capacity(5);

        let cursor = self.geometry.padding;
        let (cursor, product_lines) =
            self.draw_product(&mut canvas, &fields.product, cursor, &mut zones);
        let (cursor, flavour) = self.draw_flavour(&mut canvas, &fields.flavour, cursor, &mut zones);
        let cursor = self.draw_strength(&mut canvas, &fields.strength, cursor, &mut zones);
        let barcode = self.draw_barcode(&mut canvas, &fields, cursor, &mut zones);
        let identifier = fields.display_identifier();
        self.draw_identifier(&mut canvas, &identifier, &mut zones);

        debug!(
            side,
            product_lines = product_lines.len(),
            flavour_lines = flavour.lines.len(),
            flavour_size = flavour.font_size,
            barcode = ?barcode,
            "Label composed"
        );

        RenderedLabel {
            image: canvas,
            side_px: side,
            dpi: self.config.dpi,
            identifier,
            layout: LabelLayout {
                product_lines,
                flavour,
                strength: fields.strength,
                barcode,
                zones,
            },
        }
    }

    /// Draw `lines` centred from `top` with the zone's line spacing and
    /// return the cursor below them plus the widest line drawn.
    fn draw_lines(
        &self,
        canvas: &mut RgbImage,
        face: &FontFace,
        size: u32,
        lines: &[String],
        top: u32,
    ) -> (u32, u32) {
        let g = &self.geometry;
        let mut y = top;
        let mut widest = 0;
        for line in lines {
            let width = face.text_width(line, size);
            face.draw(canvas, g.centred_x(width), y as i32, size, line);
            y += face.line_height(size) + g.line_gap;
            widest = widest.max(width);
        }
        (y, widest)
    }

    fn draw_product(
        &self,
        canvas: &mut RgbImage,
        product: &str,
        top: u32,
        zones: &mut Vec<ZonePlacement>,
    ) -> (u32, Vec<String>) {
        let g = &self.geometry;
        if product.is_empty() {
            return (top + g.empty_product_gap, Vec::new());
        }

        let face = &self.fonts.regular;
        let lines = TextFitter::new(g.text_width, g.product_size)
            .with_reference_glyph('a')
            .with_min_columns(PRODUCT_MIN_COLUMNS)
            .wrap_at(face, product, g.product_size);
        let (y, widest) = self.draw_lines(canvas, face, g.product_size, &lines, top);

        let underline_y = y + 1;
        if widest > 0 {
            draw_filled_rect_mut(
                canvas,
                Rect::at(g.centred_x(widest), underline_y as i32)
                    .of_size(widest, g.underline_thickness),
                BLACK,
            );
        }
        zones.push(ZonePlacement {
            zone: Zone::Product,
            top,
            bottom: underline_y + g.underline_thickness,
        });
        (underline_y + g.after_product, lines)
    }

    fn draw_flavour(
        &self,
        canvas: &mut RgbImage,
        flavour: &str,
        top: u32,
        zones: &mut Vec<ZonePlacement>,
    ) -> (u32, FittedText) {
        let g = &self.geometry;
        let face = &self.fonts.bold;
        let fitted = TextFitter::new(g.text_width, g.flavour_size).fit(face, flavour);
        if fitted.is_empty() {
            return (top, fitted);
        }

        let (y, _) = self.draw_lines(canvas, face, fitted.font_size, &fitted.lines, top);
        zones.push(ZonePlacement {
            zone: Zone::Flavour,
            top,
            bottom: y,
        });
        (y + g.after_flavour, fitted)
    }

    fn draw_strength(
        &self,
        canvas: &mut RgbImage,
        strength: &str,
        top: u32,
        zones: &mut Vec<ZonePlacement>,
    ) -> u32 {
        if strength.is_empty() {
            return top;
        }
        let g = &self.geometry;
        let face = &self.fonts.regular;
        let size = g.strength_size;
        let width = face.text_width(strength, size);
        face.draw(canvas, g.centred_x(width), top as i32, size, strength);

        let bottom = top + face.line_height(size);
        zones.push(ZonePlacement {
            zone: Zone::Strength,
            top,
            bottom,
        });
        bottom + g.after_strength
    }

    fn draw_barcode(
        &self,
        canvas: &mut RgbImage,
        fields: &NormalizedRecord,
        cursor: u32,
        zones: &mut Vec<ZonePlacement>,
    ) -> BarcodeSource {
        let g = &self.geometry;
        if cursor > g.barcode_top {
            warn!(
                cursor,
                barcode_top = g.barcode_top,
                "Text zones run into the barcode zone"
            );
        }

        let bitmap = self.barcodes.render(
            fields.barcode_value(),
            g.barcode_max_width,
            g.barcode_max_height,
        );
        let x = g.centred_x(bitmap.width());
        let y = g.barcode_top + g.barcode_max_height.saturating_sub(bitmap.height()) / 2;
        let bars = DynamicImage::ImageLuma8(bitmap.image).to_rgb8();
        imageops::overlay(canvas, &bars, i64::from(x), i64::from(y));

        zones.push(ZonePlacement {
            zone: Zone::Barcode,
            top: y,
            bottom: y + bars.height(),
        });
        bitmap.source
    }

    fn draw_identifier(&self, canvas: &mut RgbImage, identifier: &str, zones: &mut Vec<ZonePlacement>) {
        let g = &self.geometry;
        let face = &self.fonts.regular;
        let size = g.identifier_size;
        let height = face.line_height(size);
        let top = g.side_px.saturating_sub(height + g.bottom_margin);
        let width = face.text_width(identifier, size);
        face.draw(canvas, g.centred_x(width), top as i32, size, identifier);
        zones.push(ZonePlacement {
            zone: Zone::Identifier,
            top,
            bottom: top + height,
        });
    }
}

/// Render a single record with a renderer built for `config`.
///
/// Resolves fonts and barcode backends on every call; batch callers should
/// build one [`LabelRenderer`] and reuse it.
pub fn render(record: &LabelRecord, config: &RenderConfig) -> Result<RenderedLabel> {
    Ok(LabelRenderer::new(config.clone())?.render(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::VectorBackend;
    use crate::canvas::geometry::canvas_pixels;
    use labelwerk_core::{BackendKind, FontCandidates, LabelError};

    /// 400 px canvas.
    fn small_config() -> RenderConfig {
        RenderConfig {
            label_side_cm: 10.16,
            dpi: 100,
            fonts: FontCandidates::none(),
            barcode_backends: Vec::new(),
            ..RenderConfig::default()
        }
    }

    fn placeholder_renderer() -> LabelRenderer {
        LabelRenderer::with_parts(
            small_config(),
            FontBook::builtin(),
            BarcodeProvider::placeholder_only(),
        )
    }

    fn vector_renderer() -> LabelRenderer {
        LabelRenderer::with_parts(
            small_config(),
            FontBook::builtin(),
            BarcodeProvider::new(vec![Box::new(VectorBackend)]),
        )
    }

    fn mint_pod() -> LabelRecord {
        LabelRecord::new("MP-020-MG", "Mint Pod [Mango / 20mg]").with_quantity(125.0, Some(60.0))
    }

    fn dark_pixels_in_rows(image: &RgbImage, top: u32, bottom: u32) -> usize {
        (top..bottom.min(image.height()))
            .flat_map(|y| (0..image.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y).0 == [0, 0, 0])
            .count()
    }

    #[test]
    fn canvas_is_square_at_configured_size() {
        let label = placeholder_renderer().render(&mint_pod());
        assert_eq!(label.side_px, 400);
        assert_eq!(label.side_px, canvas_pixels(10.16, 100));
        assert_eq!(label.image.dimensions(), (400, 400));
        assert_eq!(label.dpi, 100);
    }

    #[test]
    fn bracketed_fields_land_in_their_zones() {
        let label = placeholder_renderer().render(&mint_pod());
        assert_eq!(label.layout.product_lines, vec!["Mint Pod"]);
        assert_eq!(label.layout.flavour.lines, vec!["Mango"]);
        assert_eq!(label.layout.strength, "20mg");
        assert_eq!(label.identifier, "MP-020-MG");

        let order: Vec<Zone> = label.layout.zones.iter().map(|z| z.zone).collect();
        assert_eq!(
            order,
            vec![Zone::Product, Zone::Flavour, Zone::Strength, Zone::Barcode, Zone::Identifier]
        );
        for pair in label.layout.zones.windows(2) {
            assert!(pair[0].bottom <= pair[1].top, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        for zone in &label.layout.zones {
            assert!(dark_pixels_in_rows(&label.image, zone.top, zone.bottom) > 0, "{zone:?}");
        }
    }

    #[test]
    fn rendering_is_byte_deterministic() {
        let renderer = vector_renderer();
        let a = renderer.render(&mint_pod());
        let b = renderer.render(&mint_pod());
        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.to_png_bytes().unwrap(), b.to_png_bytes().unwrap());
    }

    #[test]
    fn vector_barcode_is_used_when_available() {
        let label = vector_renderer().render(&mint_pod());
        assert_eq!(label.layout.barcode, BarcodeSource::Backend(BackendKind::Vector));
    }

    #[test]
    fn missing_backends_draw_placeholder_bars() {
        let renderer = placeholder_renderer();
        let label = renderer.render(&mint_pod());
        assert_eq!(label.layout.barcode, BarcodeSource::Placeholder);

        let g = renderer.geometry();
        let zone = label
            .layout
            .zones
            .iter()
            .find(|z| z.zone == Zone::Barcode)
            .unwrap();
        assert_eq!(zone.top, g.barcode_top);
        assert_eq!(zone.bottom - zone.top, g.barcode_max_height);
    }

    #[test]
    fn blank_record_still_renders_identifier_and_barcode() {
        let label = vector_renderer().render(&LabelRecord::default());
        assert!(label.layout.product_lines.is_empty());
        assert!(label.layout.flavour.is_empty());
        assert!(label.identifier.starts_with("SKU-"));

        let drawn: Vec<Zone> = label.layout.zones.iter().map(|z| z.zone).collect();
        assert_eq!(drawn, vec![Zone::Barcode, Zone::Identifier]);
    }

    #[test]
    fn placeholder_identifier_is_stable_per_product() {
        let renderer = placeholder_renderer();
        let record = LabelRecord {
            identifier: Some("nan".into()),
            product: Some("Cola Ice".into()),
            ..LabelRecord::default()
        };
        let a = renderer.render(&record);
        let b = renderer.render(&record);
        assert_eq!(a.identifier, b.identifier);
        assert_eq!(a.identifier.len(), "SKU-".len() + 6);
    }

    #[test]
    fn very_long_flavour_stays_within_two_lines() {
        let record = LabelRecord::new("X1", "Pod").with_flavour(
            "Watermelon Strawberry Kiwi Bubblegum Blue Razz Lemonade Ice Extra Cold",
        );
        let label = placeholder_renderer().render(&record);
        assert!(label.layout.flavour.lines.len() <= 2);
        assert!(label.layout.flavour.font_size < placeholder_renderer().geometry().flavour_size);
    }

    #[test]
    fn free_render_rejects_invalid_config() {
        let config = RenderConfig {
            dpi: 0,
            ..small_config()
        };
        assert!(render(&mint_pod(), &config).is_err());
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocation() {
        let config = RenderConfig {
            label_side_cm: 100_000.0,
            dpi: 100_000,
            ..small_config()
        };
        assert!(matches!(render(&mint_pod(), &config), Err(LabelError::Config(_))));

        // Unvalidated parts are clamped instead.
        let renderer = LabelRenderer::with_parts(
            config,
            FontBook::builtin(),
            BarcodeProvider::placeholder_only(),
        );
        assert_eq!(renderer.geometry().side_px, labelwerk_core::MAX_CANVAS_PX);
    }

    #[test]
    fn free_render_matches_renderer() {
        let config = small_config();
        let label = render(&mint_pod(), &config).unwrap();
        let direct = placeholder_renderer().render(&mint_pod());
        assert_eq!(label.image.as_raw(), direct.image.as_raw());
    }
}
