//! Sales person and payment terms extraction.

use regex::Captures;

use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{
    NAME_SHAPE, PAYMENT_DAYS, PAYMENT_TERMS_LABEL_TEXT, SALES_PERSON_LABEL_TEXT,
    SALES_PERSON_NAME_LABELED,
};
use super::{group1, tokens, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// Tokens that make a "WORD.WORD" match something other than a person.
const NOT_A_NAME: &[&str] = &[
    // organisation suffixes
    "LLC", "LTD", "INC", "CORP", "CO", "FZE", "FZCO", "PLC",
    // address and box words
    "PO", "BOX", "PB", "ST", "RD", "BLDG",
    // web and mail
    "WWW", "COM", "NET", "ORG", "AE", "EMAIL", "MAIL",
    // labels
    "NO", "NR", "NUMBER", "DATE", "INVOICE", "TRN", "TEL", "FAX", "MOB", "QTY", "AMT", "VAT",
    "TOTAL", "SALES", "PERSON", "PAYMENT", "TERMS", "SHIP", "SHLP",
];

/// Label words that never belong to a field value.
const LABEL_WORDS: &[&str] = &[
    "SALES", "PERSON", "PAYMENT", "TERMS", "SHIP", "SHLP", "DATE", "INVOICE", "TRN", "NUMBER",
];

/// Sales person field extractor.
pub struct SalesPersonExtractor {
    cascade: Cascade,
}

impl SalesPersonExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::SalesPerson)
            .rule(Rule::pattern(
                "labeled_name_shape",
                Scope::Flat,
                &SALES_PERSON_NAME_LABELED,
                capture_name,
                is_plausible_name,
            ))
            .rule(Rule::pattern(
                "name_shape",
                Scope::Flat,
                &NAME_SHAPE,
                capture_name,
                is_plausible_name,
            ))
            .rule(Rule::pattern(
                "label_text",
                Scope::Lines,
                &SALES_PERSON_LABEL_TEXT,
                group1,
                is_plausible_label_text,
            ));

        Self { cascade }
    }
}

impl Default for SalesPersonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SalesPersonExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::SalesPerson
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// `JOHN . DOE` becomes `JOHN.DOE`.
fn capture_name(caps: &Captures<'_>) -> Option<String> {
    Some(format!("{}.{}", &caps[1], &caps[2]))
}

fn is_plausible_name(value: &str) -> bool {
    !tokens(value).any(|t| NOT_A_NAME.contains(&t.as_str()))
}

fn is_plausible_label_text(value: &str) -> bool {
    let len = value.chars().count();
    len > 1
        && len < 50
        && value.chars().any(char::is_alphabetic)
        && !tokens(value).any(|t| NOT_A_NAME.contains(&t.as_str()))
}

/// Payment terms field extractor.
pub struct PaymentTermsExtractor {
    cascade: Cascade,
}

impl PaymentTermsExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::PaymentTerms)
            .rule(Rule::pattern(
                "number_of_days",
                Scope::Flat,
                &PAYMENT_DAYS,
                |caps| Some(format!("{} {}", &caps[1], &caps[2])),
                is_plausible_terms,
            ))
            .rule(Rule::pattern(
                "label_text",
                Scope::Lines,
                &PAYMENT_TERMS_LABEL_TEXT,
                group1,
                is_plausible_terms,
            ));

        Self { cascade }
    }
}

impl Default for PaymentTermsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PaymentTermsExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::PaymentTerms
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// Length in (0, 50) and no label words.
fn is_plausible_terms(value: &str) -> bool {
    let len = value.chars().count();
    len > 0 && len < 50 && !tokens(value).any(|t| LABEL_WORDS.contains(&t.as_str()))
}

/// Extract the sales person from raw OCR text.
pub fn extract_sales_person(text: &str) -> FieldResult {
    SalesPersonExtractor::new().extract_text(text)
}

/// Extract the payment terms from raw OCR text.
pub fn extract_payment_terms(text: &str) -> FieldResult {
    PaymentTermsExtractor::new().extract_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_shape_after_label() {
        assert_eq!(
            extract_sales_person("Sales Person: RAHUL.MENON Payment Terms 60 Days").as_str(),
            "RAHUL.MENON"
        );
    }

    #[test]
    fn test_name_shape_skips_false_positives() {
        let text = "GF Corys Co.Ltd P.O. Box 1234 www.gfps.com\nSales Person Payment Terms\nanil . kumar 30 Days";
        assert_eq!(extract_sales_person(text).as_str(), "anil.kumar");
    }

    #[test]
    fn test_name_shape_beats_label_text() {
        let text = "Sales Person: Front Desk\nprepared by SARA.KHAN";
        assert_eq!(extract_sales_person(text).as_str(), "SARA.KHAN");
    }

    #[test]
    fn test_label_text_fallback() {
        let text = "Sales Person: Walk In Customer Payment Terms Cash";
        assert_eq!(extract_sales_person(text).as_str(), "Walk In Customer");
    }

    #[test]
    fn test_header_row_alone_is_not_a_name() {
        assert_eq!(extract_sales_person("Sales Person Payment Terms").as_str(), "N/A");
    }

    #[test]
    fn test_payment_days() {
        assert_eq!(extract_payment_terms("Payment Terms 60 DAYS").as_str(), "60 DAYS");
        assert_eq!(extract_payment_terms("net 30Days").as_str(), "30 Days");
    }

    #[test]
    fn test_payment_label_text() {
        assert_eq!(
            extract_payment_terms("Payment Terms: Cash Against Delivery\nShip Date 12JAN2026").as_str(),
            "Cash Against Delivery"
        );
    }

    #[test]
    fn test_payment_label_stops_at_next_label() {
        assert_eq!(
            extract_payment_terms("Payment Terms: Advance Ship Date 12JAN2026").as_str(),
            "Advance"
        );
    }

    #[test]
    fn test_payment_terms_not_found() {
        assert_eq!(extract_payment_terms("Sales Person Payment Terms").as_str(), "N/A");
    }
}
