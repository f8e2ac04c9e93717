//! Invoice date and ship date extraction.
//!
//! Both fields use the `DD-MON-YYYY` layout. Ship dates are often printed
//! compact (`11JAN2026`) and are reformatted with hyphens.

use regex::Captures;

use crate::models::invoice::{FieldResult, InvoiceField};

use super::patterns::{
    COMPACT_DATE_PARTS, DATE_COMPACT, DATE_COMPACT_OR_DASHED, DATE_DMY_LONG, DATE_DMY_LOOSE,
    DATE_DMY_SHORT, DATE_LABELED, SALES_OR_TERMS_MARKER, SHIP_DATE_LABELED,
};
use super::{char_len_within, group1, Cascade, ExtractionContext, FieldExtractor, Rule, Scope};

/// Default number of lines after the sales person / payment terms marker
/// searched for a ship date.
pub const DEFAULT_SHIP_DATE_SCAN_LINES: usize = 3;

/// Invoice date field extractor.
pub struct DateExtractor {
    cascade: Cascade,
}

impl DateExtractor {
    pub fn new() -> Self {
        let cascade = Cascade::new(InvoiceField::Date)
            .rule(Rule::pattern(
                "labeled",
                Scope::Flat,
                &DATE_LABELED,
                capture_labeled_date,
                is_plausible_date,
            ))
            .rule(Rule::pattern(
                "dmy_four_digit_year",
                Scope::Flat,
                &DATE_DMY_LONG,
                |caps| group1(caps).map(|v| v.to_uppercase()),
                is_plausible_date,
            ))
            .rule(Rule::pattern(
                "dmy_two_digit_year",
                Scope::Flat,
                &DATE_DMY_SHORT,
                |caps| group1(caps).map(|v| v.to_uppercase()),
                is_plausible_date,
            ))
            .rule(Rule::pattern(
                "dmy_loose_separators",
                Scope::Flat,
                &DATE_DMY_LOOSE,
                |caps| Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]).to_uppercase()),
                is_plausible_date,
            ));

        Self { cascade }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::Date
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        self.cascade.run(ctx.text)
    }
}

/// A date after a label, unless that label is the ship date's.
fn capture_labeled_date(caps: &Captures<'_>) -> Option<String> {
    let label = caps.get(1).map(|m| m.as_str().to_lowercase());
    if matches!(label.as_deref(), Some("ship" | "shlp" | "sh1p")) {
        return None;
    }
    caps.get(2).map(|m| compact_whitespace(m.as_str()).to_uppercase())
}

/// Ship date field extractor.
///
/// Runs after [`DateExtractor`]: a candidate equal to the invoice date is
/// rejected.
pub struct ShipDateExtractor {
    cascade: Cascade,
}

impl ShipDateExtractor {
    pub fn new() -> Self {
        Self::with_scan_lines(DEFAULT_SHIP_DATE_SCAN_LINES)
    }

    /// Search `scan_lines` lines after the sales person / payment terms row.
    pub fn with_scan_lines(scan_lines: usize) -> Self {
        let cascade = Cascade::new(InvoiceField::ShipDate)
            .rule(Rule::pattern(
                "labeled",
                Scope::Flat,
                &SHIP_DATE_LABELED,
                capture_ship_date,
                is_plausible_date,
            ))
            .rule(Rule::pattern(
                "bare_compact",
                Scope::Flat,
                &DATE_COMPACT,
                capture_ship_date,
                is_plausible_date,
            ))
            .rule(Rule::scan(
                "after_sales_terms_row",
                move |text| {
                    let lines = text.lines();
                    let Some(marker) = lines.iter().position(|l| SALES_OR_TERMS_MARKER.is_match(l)) else {
                        return Vec::new();
                    };
                    lines
                        .iter()
                        .skip(marker + 1)
                        .take(scan_lines)
                        .flat_map(|l| DATE_COMPACT_OR_DASHED.captures_iter(l))
                        .filter_map(|caps| capture_ship_date(&caps))
                        .collect()
                },
                is_plausible_date,
            ));

        Self { cascade }
    }
}

impl Default for ShipDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ShipDateExtractor {
    fn field(&self) -> InvoiceField {
        InvoiceField::ShipDate
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult {
        let invoice_date = ctx.found.date.value();
        self.cascade.run_where(ctx.text, |candidate| {
            invoice_date.is_none_or(|date| !date.eq_ignore_ascii_case(candidate))
        })
    }
}

fn capture_ship_date(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| reformat_ship_date(&compact_whitespace(m.as_str())).to_uppercase())
}

fn compact_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Insert hyphens into a compact `DDMONYYYY` date.
///
/// Anything that is not a compact date, including an already hyphenated
/// one, is returned unchanged.
pub fn reformat_ship_date(value: &str) -> String {
    if value.contains('-') {
        return value.to_string();
    }
    match COMPACT_DATE_PARTS.captures(value) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => value.to_string(),
    }
}

/// Length in [8, 15] and a three-letter month token.
fn is_plausible_date(value: &str) -> bool {
    if !char_len_within(value, 8, 15) {
        return false;
    }
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == 3 && parts[1].len() == 3 && parts[1].chars().all(|c| c.is_ascii_alphabetic())
}

/// Extract the invoice date from raw OCR text.
pub fn extract_date(text: &str) -> FieldResult {
    DateExtractor::new().extract_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::normalize::NormalizedText;
    use crate::models::invoice::InvoiceExtractionResult;
    use pretty_assertions::assert_eq;

    fn ship_date(text: &str, invoice_date: Option<&str>) -> FieldResult {
        let normalized = NormalizedText::new(text);
        let mut found = InvoiceExtractionResult::default();
        if let Some(date) = invoice_date {
            found.date = FieldResult::found(date);
        }
        ShipDateExtractor::new().extract(&ExtractionContext {
            text: &normalized,
            found: &found,
        })
    }

    #[test]
    fn test_reformat_compact_ship_date() {
        assert_eq!(reformat_ship_date("11JAN2026"), "11-JAN-2026");
        assert_eq!(reformat_ship_date("11-JAN-2026"), "11-JAN-2026");
        assert_eq!(reformat_ship_date("11-JAN2026"), "11-JAN2026");
        assert_eq!(reformat_ship_date("garbage"), "garbage");
    }

    #[test]
    fn test_labeled_invoice_date() {
        assert_eq!(
            extract_date("Invoice Date: 11-Jan-2026 Due Date: 10-MAR-2026").as_str(),
            "11-JAN-2026"
        );
    }

    #[test]
    fn test_labeled_date_skips_ship_date_label() {
        let text = "Ship Date 09-JAN-2026 Invoice Date 11-JAN-2026";
        assert_eq!(extract_date(text).as_str(), "11-JAN-2026");
    }

    #[test]
    fn test_bare_and_two_digit_year_dates() {
        assert_eq!(extract_date("issued 11-APR-2026 at Dubai").as_str(), "11-APR-2026");
        assert_eq!(extract_date("issued 11-APR-26").as_str(), "11-APR-26");
    }

    #[test]
    fn test_loose_separators() {
        assert_eq!(extract_date("on 11 . JAN . 2026").as_str(), "11-JAN-2026");
    }

    #[test]
    fn test_month_must_be_letters() {
        assert_eq!(extract_date("11-123-2026").as_str(), "N/A");
        assert!(!is_plausible_date("11-JANU-2026"));
        assert!(is_plausible_date("11-JAN-26"));
    }

    #[test]
    fn test_ship_date_label_with_misread() {
        assert_eq!(
            ship_date("Shlp Date: 12JAN2026", Some("11-JAN-2026")).as_str(),
            "12-JAN-2026"
        );
    }

    #[test]
    fn test_ship_date_rejects_invoice_date() {
        let text = "Invoice Date 11-JAN-2026\nShip Date 11JAN2026\nnotes 14FEB2026";
        assert_eq!(ship_date(text, Some("11-JAN-2026")).as_str(), "14-FEB-2026");
        assert_eq!(ship_date("Ship Date 11JAN2026", Some("11-JAN-2026")).as_str(), "N/A");
    }

    #[test]
    fn test_ship_date_after_sales_terms_row() {
        let text = "Sales Person Payment Terms\nJOHN.DOE 30 Days 15-JAN-2026\nS.No Item";
        assert_eq!(ship_date(text, Some("11-JAN-2026")).as_str(), "15-JAN-2026");
    }

    #[test]
    fn test_ship_date_not_found() {
        assert_eq!(ship_date("nothing here", None).as_str(), "N/A");
    }
}
