//! Company name extraction.
//!
//! The issuing company is normally printed in the letterhead, so the first
//! lines are inspected before any document-wide suffix search.

use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{BUSINESS_SUFFIX, COMPANY_IDENTIFIER, COMPANY_SUFFIX_LINE, COMPANY_SUFFIX_WORDS, ORG_KEYWORD};
use super::{group1, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// Default number of leading lines searched by the letterhead heuristics.
pub const DEFAULT_SCAN_LINES: usize = 10;

/// Company name field extractor.
pub struct CompanyNameExtractor {
    cascade: Cascade,
}

impl CompanyNameExtractor {
    pub fn new() -> Self {
        Self::with_scan_lines(DEFAULT_SCAN_LINES)
    }

    /// Limit the letterhead heuristics to the first `scan_lines` lines.
    pub fn with_scan_lines(scan_lines: usize) -> Self {
        let cascade = Cascade::new(InvoiceField::CompanyName)
            .rule(Rule::scan(
                "letterhead_anchor_pair",
                move |text| {
                    text.lines()
                        .iter()
                        .take(scan_lines)
                        .filter(|l| ORG_KEYWORD.is_match(l) && COMPANY_IDENTIFIER.is_match(l))
                        .map(|l| clean_company(l))
                        .collect()
                },
                is_plausible_company,
            ))
            .rule(Rule::scan(
                "letterhead_suffix",
                move |text| {
                    text.lines()
                        .iter()
                        .take(scan_lines)
                        .filter(|l| BUSINESS_SUFFIX.is_match(l))
                        .map(|l| clean_company(l))
                        .collect()
                },
                is_plausible_company,
            ))
            .rule(Rule::pattern(
                "suffix_line",
                Scope::Lines,
                &COMPANY_SUFFIX_LINE,
                |caps| group1(caps).map(|v| clean_company(&v)),
                is_plausible_company,
            ))
            .rule(Rule::pattern(
                "suffix_words",
                Scope::Flat,
                &COMPANY_SUFFIX_WORDS,
                |caps| group1(caps).map(|v| clean_company(&v)),
                is_plausible_company,
            ));

        Self { cascade }
    }
}

impl Default for CompanyNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CompanyNameExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::CompanyName
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

fn clean_company(line: &str) -> String {
    line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | ':'))
        .to_string()
}

/// Length in [10, 100) with at least one uppercase letter.
fn is_plausible_company(value: &str) -> bool {
    let len = value.chars().count();
    (10..100).contains(&len) && value.chars().any(char::is_uppercase)
}

/// Extract the company name from raw OCR text.
pub fn extract_company_name(text: &str) -> FieldResult {
    CompanyNameExtractor::new().extract_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anchor_pair_in_letterhead() {
        let text = "TAX INVOICE\nGF Corys Piping Systems\nP.O. Box 12345, Dubai";
        assert_eq!(extract_company_name(text).as_str(), "GF Corys Piping Systems");
    }

    #[test]
    fn test_suffix_line_in_letterhead() {
        let text = "Blue Water Trading LLC\nJebel Ali Free Zone";
        assert_eq!(extract_company_name(text).as_str(), "Blue Water Trading LLC");
    }

    #[test]
    fn test_letterhead_beats_document_wide_suffix() {
        let mut text = String::from("ACME PIPING SYSTEMS MIDDLE EAST\n");
        for i in 0..12 {
            text.push_str(&format!("filler line {}\n", i));
        }
        text.push_str("Consignee: Other Builders LLC\n");

        assert_eq!(
            extract_company_name(&text).as_str(),
            "ACME PIPING SYSTEMS MIDDLE EAST"
        );
    }

    #[test]
    fn test_short_line_rejected_and_cascade_continues() {
        let mut text = String::from("ACME LLC\n");
        for i in 0..12 {
            text.push_str(&format!("row {}\n", i));
        }
        text.push_str("Shipped by Desert Rose Logistics LLC\n");

        // "ACME LLC" is 8 characters: rejected by the letterhead rule and the
        // document-wide rule alike.
        assert_eq!(
            extract_company_name(&text).as_str(),
            "Shipped by Desert Rose Logistics LLC"
        );
    }

    #[test]
    fn test_requires_uppercase() {
        assert!(!is_plausible_company("lowercase trading llc"));
        assert!(is_plausible_company("Lowercase trading llc"));
    }

    #[test]
    fn test_scan_window_is_configurable() {
        let text = "line one\nline two\nGF Corys Piping Systems";
        let narrow = CompanyNameExtractor::with_scan_lines(2);
        assert!(!narrow.extract_text(text).is_found());

        let wide = CompanyNameExtractor::with_scan_lines(3);
        assert_eq!(wide.extract_text(text).as_str(), "GF Corys Piping Systems");
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_company_name("12345 67890").as_str(), "N/A");
    }
}
