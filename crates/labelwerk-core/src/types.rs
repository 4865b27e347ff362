// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Labelwerk rendering engine.

use serde::{Deserialize, Deserializer, Serialize};

/// One tabular row describing a product that needs case labels.
///
/// Optional text fields are tolerated in any state: absent, empty, or one of
/// the spreadsheet "missing" tokens (`none`, `nan`, `na`). Normalisation
/// happens in [`crate::normalize`], never here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRecord {
    /// SKU or other scannable identifier; encoded in the barcode.
    #[serde(alias = "sku", alias = "Sku")]
    pub identifier: Option<String>,
    /// Product name, possibly carrying a trailing `[flavour / strength]` token.
    #[serde(alias = "Product")]
    pub product: Option<String>,
    #[serde(alias = "Flavour", alias = "flavor")]
    pub flavour: Option<String>,
    #[serde(alias = "Strength")]
    pub strength: Option<String>,
    /// Units still to be received. Negative or NaN values count as zero.
    #[serde(alias = "Outstanding", deserialize_with = "lenient_quantity")]
    pub outstanding: f64,
    /// Units per shipping case. `None` means "use the configured default".
    #[serde(alias = "Case_Size", deserialize_with = "lenient_case_size")]
    pub case_size: Option<f64>,
}

impl LabelRecord {
    pub fn new(identifier: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            product: Some(product.into()),
            ..Self::default()
        }
    }

    pub fn with_flavour(mut self, flavour: impl Into<String>) -> Self {
        self.flavour = Some(flavour.into());
        self
    }

    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = Some(strength.into());
        self
    }

    pub fn with_quantity(mut self, outstanding: f64, case_size: Option<f64>) -> Self {
        self.outstanding = outstanding;
        self.case_size = case_size;
        self
    }

    /// A blank row has neither a product nor an identifier worth printing.
    pub fn is_blank(&self) -> bool {
        crate::normalize::clean_optional(self.product.as_deref()).is_empty()
            && crate::normalize::clean_optional(self.identifier.as_deref()).is_empty()
    }
}

/// Spreadsheet exports put numbers, numeric strings, blanks and junk in the
/// same column. Anything that is not a finite number reads as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

fn lenient_case_size<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer)
}

/// Barcode backends, in the order a configuration ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Draws bars as geometry directly at the target scale.
    Vector,
    /// Renders a module bitmap through a transient PNG and resamples it.
    Raster,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Raster => "raster",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The five fixed vertical regions of the label template, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Product,
    Flavour,
    Strength,
    Barcode,
    Identifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_spreadsheet_column_names() {
        let record: LabelRecord = serde_json::from_str(
            r#"{ "Sku": "A-1", "Product": "Mint Pod", "Outstanding": 125, "Case_Size": "60" }"#,
        )
        .unwrap();
        assert_eq!(record.identifier.as_deref(), Some("A-1"));
        assert_eq!(record.outstanding, 125.0);
        assert_eq!(record.case_size, Some(60.0));
    }

    #[test]
    fn non_numeric_quantities_read_as_absent() {
        let record: LabelRecord =
            serde_json::from_str(r#"{ "outstanding": "lots", "case_size": null }"#).unwrap();
        assert_eq!(record.outstanding, 0.0);
        assert_eq!(record.case_size, None);

        let record: LabelRecord =
            serde_json::from_str(r#"{ "outstanding": true, "case_size": "n/a" }"#).unwrap();
        assert_eq!(record.outstanding, 0.0);
        assert_eq!(record.case_size, None);
    }

    #[test]
    fn blank_rows_are_detected() {
        assert!(LabelRecord::default().is_blank());
        let mut record = LabelRecord::default();
        record.product = Some("  nan ".into());
        assert!(record.is_blank());
        assert!(!LabelRecord::new("SKU-1", "").is_blank());
    }

    #[test]
    fn backend_kind_uses_lowercase_names() {
        let kinds: Vec<BackendKind> = serde_json::from_str(r#"["vector", "raster"]"#).unwrap();
        assert_eq!(kinds, vec![BackendKind::Vector, BackendKind::Raster]);
        assert_eq!(BackendKind::Raster.to_string(), "raster");
    }
}
