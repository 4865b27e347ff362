// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Code 128 symbology — encodes a value into a row of modules via `rxing`.

use image::{GrayImage, Luma};
use labelwerk_core::error::{LabelError, Result};
use rxing::oned::Code128Writer;
use rxing::{BarcodeFormat, Writer};

/// One row of Code 128 modules, quiet zones included. `true` is a bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRow {
    modules: Vec<bool>,
}

impl ModuleRow {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Dark runs as `(first_module, run_length)`.
    pub fn bars(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, &dark) in self.modules.iter().enumerate() {
            match (dark, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.modules.len() - s));
        }
        runs
    }

    /// Unscaled bitmap: `module_px` pixels per module, `height` pixels tall.
    pub fn to_bitmap(&self, module_px: u32, height: u32) -> GrayImage {
        let module_px = module_px.max(1);
        let width = (self.modules.len() as u32 * module_px).max(1);
        GrayImage::from_fn(width, height.max(1), |x, _| {
            let dark = self
                .modules
                .get((x / module_px) as usize)
                .copied()
                .unwrap_or(false);
            if dark { Luma([0]) } else { Luma([255]) }
        })
    }
}

/// Encode `value` as Code 128.
///
/// Only printable ASCII is accepted; anything else is an error so the
/// provider can fall through.
pub fn encode_code128(value: &str) -> Result<ModuleRow> {
    if value.is_empty() {
        return Err(LabelError::Barcode("empty barcode value".into()));
    }
    if let Some(bad) = value.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(LabelError::Barcode(format!(
            "character {bad:?} cannot be encoded in Code 128"
        )));
    }

    let matrix = Code128Writer::default()
        .encode(value, &BarcodeFormat::CODE_128, 0, 0)
        .map_err(|err| LabelError::Barcode(format!("Code 128 encoding failed: {err}")))?;

    let modules: Vec<bool> = (0..matrix.width()).map(|x| matrix.get(x, 0)).collect();
    if !modules.iter().any(|&dark| dark) {
        return Err(LabelError::Barcode("encoder produced no bars".into()));
    }
    Ok(ModuleRow { modules })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_printable_ascii_with_quiet_zones() {
        let row = encode_code128("SKU-12345").unwrap();
        assert!(!row.modules()[0], "leading quiet zone");
        assert!(!row.modules()[row.len() - 1], "trailing quiet zone");
        // Every Code 128 symbol ends with the two-module stop bar.
        let last_bar = row.bars().last().copied().unwrap();
        assert_eq!(last_bar.1, 2);
    }

    #[test]
    fn same_value_same_modules() {
        assert_eq!(encode_code128("ABC").unwrap(), encode_code128("ABC").unwrap());
        assert_ne!(encode_code128("ABC").unwrap(), encode_code128("ABD").unwrap());
    }

    #[test]
    fn rejects_empty_and_non_ascii() {
        assert!(encode_code128("").is_err());
        assert!(encode_code128("café").is_err());
        assert!(encode_code128("tab\there").is_err());
    }

    #[test]
    fn space_is_encodable() {
        assert!(encode_code128(" ").is_ok());
    }

    #[test]
    fn bitmap_has_expected_geometry() {
        let row = encode_code128("42").unwrap();
        let bitmap = row.to_bitmap(3, 20);
        assert_eq!(bitmap.width(), row.len() as u32 * 3);
        assert_eq!(bitmap.height(), 20);
        let (first, _) = row.bars()[0];
        assert_eq!(bitmap.get_pixel(first as u32 * 3, 10).0[0], 0);
        assert_eq!(bitmap.get_pixel(0, 10).0[0], 255);
    }
}
