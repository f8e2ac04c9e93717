//! Delivery order (D.O.) and sales order (S.O.) number extraction.
//!
//! Both numbers usually sit in a reference block between the document title
//! and the item table. When the label and the value are split across lines,
//! that block is scanned for a digit run with the expected leading digit.

use regex::Regex;

use crate::invoice::normalize::NormalizedText;
use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{
    DO_NUMBER_DIGITS, DO_NUMBER_LABELED, ORDER_HEADER_MARKER, SO_NUMBER_DIGITS, SO_NUMBER_LABELED,
    TABLE_HEADER,
};
use super::{char_len_within, group1, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// Delivery order number field extractor.
pub struct DoNumberExtractor {
    cascade: Cascade,
}

impl DoNumberExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::DoNumber)
            .rule(Rule::pattern(
                "labeled",
                Scope::Lines,
                &DO_NUMBER_LABELED,
                group1,
                is_plausible_order_number,
            ))
            .rule(Rule::scan(
                "reference_block_leading_8",
                |text| scan_reference_block(text, &DO_NUMBER_DIGITS),
                is_plausible_order_number,
            ));

        Self { cascade }
    }
}

impl Default for DoNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DoNumberExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::DoNumber
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// Sales order number field extractor.
pub struct SoNumberExtractor {
    cascade: Cascade,
}

impl SoNumberExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::SoNumber)
            .rule(Rule::pattern(
                "labeled",
                Scope::Lines,
                &SO_NUMBER_LABELED,
                group1,
                is_plausible_order_number,
            ))
            .rule(Rule::scan(
                "reference_block_leading_1_2",
                |text| scan_reference_block(text, &SO_NUMBER_DIGITS),
                is_plausible_order_number,
            ));

        Self { cascade }
    }
}

impl Default for SoNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SoNumberExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::SoNumber
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// Digit runs found from the first header-marker line up to, not including,
/// the item-table header.
fn scan_reference_block(text: &NormalizedText, digits: &Regex) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut in_block = false;

    for line in text.lines() {
        let is_marker = ORDER_HEADER_MARKER.is_match(line);
        if in_block && TABLE_HEADER.is_match(line) && !is_marker {
            break;
        }
        in_block |= is_marker;
        if in_block {
            candidates.extend(digits.captures_iter(line).map(|caps| caps[1].to_string()));
        }
    }

    candidates
}

fn is_plausible_order_number(value: &str) -> bool {
    char_len_within(value, 6, 12) && value.chars().all(|c| c.is_ascii_digit())
}

/// Extract the delivery order number from raw OCR text.
pub fn extract_do_number(text: &str) -> FieldResult {
    DoNumberExtractor::new().extract_text(text)
}

/// Extract the sales order number from raw OCR text.
pub fn extract_so_number(text: &str) -> FieldResult {
    SoNumberExtractor::new().extract_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPLIT_BLOCK: &str = "TAX INVOICE\n\
        D.O. Number S.O. Number\n\
        80012345 20098765\n\
        S.No Item Code Description Qty\n\
        1 A1234567890 PVC PIPE 80099999 EA 1.000\n";

    #[test]
    fn test_labeled_numbers() {
        let text = "D.O. Number: 80012345 S.O. Number: 20098765";
        assert_eq!(extract_do_number(text).as_str(), "80012345");
        assert_eq!(extract_so_number(text).as_str(), "20098765");
    }

    #[test]
    fn test_labeled_number_with_no_abbreviation() {
        assert_eq!(extract_do_number("DO No. 80012345").as_str(), "80012345");
    }

    #[test]
    fn test_split_label_and_value() {
        assert_eq!(extract_do_number(SPLIT_BLOCK).as_str(), "80012345");
        assert_eq!(extract_so_number(SPLIT_BLOCK).as_str(), "20098765");
    }

    #[test]
    fn test_scan_stops_at_table_header() {
        let text = "TAX INVOICE\nS.No Item Code Description\n1 A1234567890 PVC 80012345 20098765";
        assert_eq!(extract_do_number(text).as_str(), "N/A");
        assert_eq!(extract_so_number(text).as_str(), "N/A");
    }

    #[test]
    fn test_scan_ignores_column_words_before_marker() {
        let text = "VAT Reg No 5\nTAX INVOICE\nD.O. Number S.O. Number\n80012345 20098765\nQty";
        assert_eq!(extract_do_number(text).as_str(), "80012345");
        assert_eq!(extract_so_number(text).as_str(), "20098765");
    }

    #[test]
    fn test_scan_requires_marker() {
        assert_eq!(extract_do_number("ref 80012345").as_str(), "N/A");
    }
}
