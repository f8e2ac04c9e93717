//! TRN (Tax Registration Number) extraction.

use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{DIGITS_15, TRN_LABELED, TRN_LABELED_SPACED, TRN_LEADING_100};
use super::{char_len_within, group1, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// TRN field extractor.
pub struct TrnExtractor {
    cascade: Cascade,
}

impl TrnExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::Trn)
            .rule(Rule::pattern("labeled", Scope::Flat, &TRN_LABELED, group1, is_plausible_trn))
            .rule(Rule::pattern(
                "labeled_spaced",
                Scope::Flat,
                &TRN_LABELED_SPACED,
                |caps| group1(caps).map(|v| v.replace(' ', "")),
                is_plausible_trn,
            ))
            // Registration numbers issued in this layout family start with 100.
            .rule(Rule::pattern(
                "leading_100",
                Scope::Flat,
                &TRN_LEADING_100,
                group1,
                is_plausible_trn,
            ))
            .rule(Rule::pattern("bare_15_digits", Scope::Flat, &DIGITS_15, group1, is_plausible_trn));

        Self { cascade }
    }
}

impl Default for TrnExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TrnExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::Trn
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

fn is_plausible_trn(value: &str) -> bool {
    char_len_within(value, 12, 20) && value.chars().all(|c| c.is_ascii_digit())
}

/// Extract the TRN from raw OCR text.
pub fn extract_trn(text: &str) -> FieldResult {
    TrnExtractor::new().extract_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_trn() {
        assert_eq!(extract_trn("TRN: 100234567800003").as_str(), "100234567800003");
        assert_eq!(
            extract_trn("Tax Registration No. 100234567800003").as_str(),
            "100234567800003"
        );
    }

    #[test]
    fn test_spaced_trn() {
        assert_eq!(extract_trn("TRN 100 2345 6780 0003").as_str(), "100234567800003");
    }

    #[test]
    fn test_label_beats_bare_run() {
        let text = "Ref 123456789012345 Customer TRN 100987654300003";
        assert_eq!(extract_trn(text).as_str(), "100987654300003");
    }

    #[test]
    fn test_leading_convention_fallback() {
        assert_eq!(extract_trn("our no. 1002345678901").as_str(), "1002345678901");
    }

    #[test]
    fn test_bare_fifteen_digits() {
        assert_eq!(extract_trn("registered 300234567800003").as_str(), "300234567800003");
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_trn("TRN pending 12345").as_str(), "N/A");
    }
}
