//! Invoice number extraction.

use regex::Captures;

use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{
    DIGITS_10_12, DIGITS_8_9, INVOICE_NUMBER_LABELED, INVOICE_NUMBER_NEAR, TRN_LABEL,
};
use super::{char_len_within, group1, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// Invoice number field extractor.
pub struct InvoiceNumberExtractor {
    cascade: Cascade,
}

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::InvoiceNumber)
            .rule(Rule::pattern(
                "labeled",
                Scope::Flat,
                &INVOICE_NUMBER_LABELED,
                group1,
                is_plausible_invoice_number,
            ))
            .rule(Rule::pattern(
                "near_invoice",
                Scope::Flat,
                &INVOICE_NUMBER_NEAR,
                group1_without_trn_label,
                is_plausible_invoice_number,
            ))
            .rule(Rule::pattern(
                "bare_10_12_digits",
                Scope::Flat,
                &DIGITS_10_12,
                group1,
                is_plausible_invoice_number,
            ))
            .rule(Rule::pattern(
                "bare_8_9_digits",
                Scope::Flat,
                &DIGITS_8_9,
                group1,
                is_plausible_invoice_number,
            ));

        Self { cascade }
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::InvoiceNumber
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// Group 1, unless the gap after "invoice" crosses a tax registration label.
fn group1_without_trn_label(caps: &Captures<'_>) -> Option<String> {
    if TRN_LABEL.is_match(caps.get(0)?.as_str()) {
        return None;
    }
    group1(caps)
}

fn is_plausible_invoice_number(value: &str) -> bool {
    char_len_within(value, 6, 15)
}

/// Extract the invoice number from raw OCR text.
pub fn extract_invoice_number(text: &str) -> FieldResult {
    InvoiceNumberExtractor::new().extract_text(text)
}
