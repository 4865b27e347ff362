// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field normaliser — pulls flavour and strength out of a trailing
// `[flavour / strength]` token in the product text and resolves them against
// any explicitly supplied values. Pure and idempotent.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::types::LabelRecord;

/// Trailing `[...]` with non-empty content, optionally followed by whitespace.
fn bracket_token() -> &'static Regex {
    static BRACKET_TOKEN: OnceLock<Regex> = OnceLock::new();
    BRACKET_TOKEN.get_or_init(|| Regex::new(r"\[([^\]]+)\]\s*$").expect("valid regex"))
}

/// Separators allowed inside the bracket, with optional padding.
fn segment_separator() -> &'static Regex {
    static SEGMENT_SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEGMENT_SEPARATOR.get_or_init(|| Regex::new(r"\s*[/\-|;]\s*").expect("valid regex"))
}

/// Spreadsheet placeholders that mean "no value".
const MISSING_TOKENS: [&str; 3] = ["none", "nan", "na"];

/// Result of splitting a product string on its bracketed suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BracketSplit {
    pub product: String,
    /// Empty when there was no bracket or no first segment.
    pub flavour: String,
    pub strength: String,
}

/// A record after normalisation: every text field is a plain, trimmed string
/// and flavour/strength never carry bracket syntax.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRecord {
    /// Raw identifier, empty when absent.
    pub identifier: String,
    pub product: String,
    pub flavour: String,
    pub strength: String,
}

impl NormalizedRecord {
    /// Text printed in the identifier zone.
    ///
    /// Records without an identifier get `SKU-XXXXXX`, derived from the
    /// product text so repeated renders stay byte-identical.
    pub fn display_identifier(&self) -> String {
        if !self.identifier.is_empty() {
            return self.identifier.clone();
        }
        let digest = Sha256::digest(self.product.as_bytes());
        format!("SKU-{}", hex::encode_upper(&digest[..3]))
    }

    /// Value encoded in the barcode. A lone space when there is no identifier.
    pub fn barcode_value(&self) -> &str {
        if self.identifier.is_empty() {
            " "
        } else {
            &self.identifier
        }
    }
}

/// Trim an optional field and map missing tokens to the empty string.
pub fn clean_optional(value: Option<&str>) -> String {
    let trimmed = value.unwrap_or_default().trim();
    if MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Split a trailing bracketed token off the product text.
///
/// `"Mint Pod [Mango / 20mg]"` becomes product `"Mint Pod"`, flavour
/// `"Mango"`, strength `"20mg"`. Segments past the second are dropped, as are
/// empty segments before the positional pick. Any further trailing tokens are
/// stripped from the product too, so splitting the result again is a no-op.
/// Text without a bracket passes through unchanged.
pub fn split_bracketed(product: &str) -> BracketSplit {
    let text = product.trim();
    let Some(captures) = bracket_token().captures(text) else {
        return BracketSplit {
            product: text.to_string(),
            ..BracketSplit::default()
        };
    };

    let (Some(whole), Some(inside)) = (captures.get(0), captures.get(1)) else {
        return BracketSplit {
            product: text.to_string(),
            ..BracketSplit::default()
        };
    };

    let mut segments = segment_separator()
        .split(inside.as_str().trim())
        .map(|segment| segment.trim_matches(|c: char| c == '[' || c.is_whitespace()))
        .filter(|segment| !segment.is_empty());
    let flavour = segments.next().unwrap_or_default().to_string();
    let strength = segments.next().unwrap_or_default().to_string();

    let mut remaining = text[..whole.start()].trim();
    while let Some(token) = bracket_token().find(remaining) {
        debug!(token = token.as_str(), "Dropping extra bracketed token");
        remaining = remaining[..token.start()].trim();
    }

    BracketSplit {
        product: remaining.to_string(),
        flavour,
        strength,
    }
}

/// Normalise a record: clean every text field, strip the bracket token from
/// the product and fill flavour/strength from it only where the explicit
/// field is empty.
pub fn normalize(record: &LabelRecord) -> NormalizedRecord {
    let split = split_bracketed(&clean_optional(record.product.as_deref()));
    let explicit_flavour = clean_optional(record.flavour.as_deref());
    let explicit_strength = clean_optional(record.strength.as_deref());

    let normalized = NormalizedRecord {
        identifier: clean_optional(record.identifier.as_deref()),
        product: clean_optional(Some(&split.product)),
        flavour: prefer_explicit(explicit_flavour, split.flavour),
        strength: prefer_explicit(explicit_strength, split.strength),
    };

    debug!(
        identifier = %normalized.identifier,
        product = %normalized.product,
        flavour = %normalized.flavour,
        strength = %normalized.strength,
        "Record normalised"
    );
    normalized
}

fn prefer_explicit(explicit: String, derived: String) -> String {
    if explicit.is_empty() { derived } else { explicit }
}

impl LabelRecord {
    pub fn normalized(&self) -> NormalizedRecord {
        normalize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_token_is_split_into_flavour_and_strength() {
        let split = split_bracketed("Mint Pod [Mango / 20mg]");
        assert_eq!(split.product, "Mint Pod");
        assert_eq!(split.flavour, "Mango");
        assert_eq!(split.strength, "20mg");
    }

    #[test]
    fn no_bracket_passes_through() {
        let split = split_bracketed("Mint Pod");
        assert_eq!(split.product, "Mint Pod");
        assert!(split.flavour.is_empty());
        assert!(split.strength.is_empty());
    }

    #[test]
    fn all_separators_are_accepted() {
        for text in [
            "X [Apple/10mg]",
            "X [Apple - 10mg]",
            "X [Apple|10mg]",
            "X [Apple ; 10mg]",
        ] {
            let split = split_bracketed(text);
            assert_eq!(split.product, "X", "{text}");
            assert_eq!(split.flavour, "Apple", "{text}");
            assert_eq!(split.strength, "10mg", "{text}");
        }
    }

    #[test]
    fn extra_segments_are_discarded_and_single_segment_has_no_strength() {
        let split = split_bracketed("X [A / B / C]");
        assert_eq!((split.flavour.as_str(), split.strength.as_str()), ("A", "B"));

        let split = split_bracketed("X [Cola]");
        assert_eq!(split.flavour, "Cola");
        assert!(split.strength.is_empty());
    }

    #[test]
    fn separator_only_bracket_yields_empty_values() {
        let split = split_bracketed("Pod [ / ]");
        assert_eq!(split.product, "Pod");
        assert!(split.flavour.is_empty());
        assert!(split.strength.is_empty());
    }

    #[test]
    fn bracket_must_be_trailing() {
        let split = split_bracketed("Pod [Mango/20mg] extra");
        assert_eq!(split.product, "Pod [Mango/20mg] extra");
        assert!(split.flavour.is_empty());
    }

    #[test]
    fn explicit_fields_win_over_derived_ones() {
        let record = LabelRecord::new("S1", "X [Mango/20mg]").with_flavour("Berry");
        let normalized = normalize(&record);
        assert_eq!(normalized.product, "X");
        assert_eq!(normalized.flavour, "Berry");
        assert_eq!(normalized.strength, "20mg");
    }

    #[test]
    fn missing_tokens_do_not_block_derived_values() {
        let record = LabelRecord::new("S1", "X [Mango/20mg]")
            .with_flavour("NaN")
            .with_strength("  ");
        let normalized = normalize(&record);
        assert_eq!(normalized.flavour, "Mango");
        assert_eq!(normalized.strength, "20mg");
    }

    #[test]
    fn normalisation_is_idempotent() {
        let record = LabelRecord::new("S1", "Mint Pod [Mango / 20mg]");
        let first = normalize(&record);
        let again = normalize(&LabelRecord {
            identifier: Some(first.identifier.clone()),
            product: Some(first.product.clone()),
            flavour: Some(first.flavour.clone()),
            strength: Some(first.strength.clone()),
            ..LabelRecord::default()
        });
        assert_eq!(first, again);
        assert!(!again.flavour.contains('[') && !again.strength.contains(']'));
    }

    #[test]
    fn stacked_bracket_tokens_normalise_idempotently() {
        for product in ["Pod [A] [B/20mg]", "nan [Mango/20mg]", "Pod [[Kiwi / 5mg]"] {
            let first = normalize(&LabelRecord::new("S1", product));
            let again = normalize(&LabelRecord {
                identifier: Some(first.identifier.clone()),
                product: Some(first.product.clone()),
                flavour: Some(first.flavour.clone()),
                strength: Some(first.strength.clone()),
                ..LabelRecord::default()
            });
            assert_eq!(first, again, "{product}");
            assert!(!first.flavour.contains('['), "{product}");
        }

        let split = split_bracketed("Pod [A] [B/20mg]");
        assert_eq!(split.product, "Pod");
        assert_eq!((split.flavour.as_str(), split.strength.as_str()), ("B", "20mg"));
    }

    #[test]
    fn empty_leading_segment_is_skipped_before_positional_pick() {
        let split = split_bracketed("Pod [ / 20mg]");
        assert_eq!(split.product, "Pod");
        assert_eq!(split.flavour, "20mg");
        assert!(split.strength.is_empty());
    }

    #[test]
    fn placeholder_identifier_is_stable() {
        let record = LabelRecord {
            product: Some("Mint Pod".into()),
            ..LabelRecord::default()
        };
        let a = normalize(&record).display_identifier();
        let b = normalize(&record).display_identifier();
        assert_eq!(a, b);
        assert!(a.starts_with("SKU-"));
        assert_eq!(a.len(), 10);
        assert_eq!(normalize(&record).barcode_value(), " ");
    }
}
