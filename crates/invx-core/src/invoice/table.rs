//! Line-item table extraction.
//!
//! The item grid is located with a small state machine over the
//! line-preserving normalized text. Rows are keyed on an item-code token;
//! OCR often wraps a row, so the following line is joined into the same
//! row fragment before the columns are parsed.

use tracing::{debug, trace};

use crate::models::invoice::LineItem;

use super::rules::patterns::{
    DECIMAL_TOKEN, ITEM_CODE, ITEM_DESCRIPTION, TABLE_FOOTER, TABLE_HEADER, UNIT_OF_MEASURE,
    VAT_PERCENT,
};

/// Position of the scanner relative to the item grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// No header line seen yet.
    BeforeTable,
    /// Between the header and a footer line.
    InTable,
    /// A footer line was seen; nothing after it is read.
    Done,
}

/// Extracts line items from normalized lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineItemExtractor;

impl LineItemExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scan `lines` and return the accepted rows in encounter order.
    pub fn extract(&self, lines: &[String]) -> Vec<LineItem> {
        let mut state = TableState::BeforeTable;
        let mut items: Vec<LineItem> = Vec::new();
        let mut index = 0;

        while index < lines.len() && state != TableState::Done {
            let line = &lines[index];
            index += 1;

            match state {
                TableState::BeforeTable => {
                    if TABLE_HEADER.is_match(line) {
                        debug!(line = %line, "table header found");
                        state = TableState::InTable;
                    }
                }
                TableState::InTable => {
                    // Column labels such as "Total Excl VAT" read as footers,
                    // so header lines win until the first row is accepted.
                    if items.is_empty() && is_header_continuation(line) {
                        trace!(line = %line, "header continuation");
                    } else if is_footer(line) {
                        debug!(line = %line, rows = items.len(), "table footer found");
                        state = TableState::Done;
                    } else if ITEM_CODE.is_match(line) {
                        let mut fragment = line.clone();
                        if let Some(next) = lines.get(index) {
                            if !is_footer(next) && !ITEM_CODE.is_match(next) {
                                fragment.push(' ');
                                fragment.push_str(next);
                                index += 1;
                            }
                        }
                        if let Some(item) = parse_row_fragment(&fragment, items.len() + 1) {
                            items.push(item);
                        }
                    } else {
                        trace!(line = %line, "line outside any row");
                    }
                }
                TableState::Done => {}
            }
        }

        items
    }
}

fn is_header_continuation(line: &str) -> bool {
    TABLE_HEADER.is_match(line) && !ITEM_CODE.is_match(line)
}

fn is_footer(line: &str) -> bool {
    TABLE_FOOTER.is_match(line)
}

/// Parse one row fragment into a line item numbered `serial`.
///
/// Returns `None` when the fragment carries no item code.
pub fn parse_row_fragment(fragment: &str, serial: usize) -> Option<LineItem> {
    let code = ITEM_CODE.captures(fragment)?.get(1)?.as_str();
    let mut item = LineItem::new(serial, code);

    item.description = ITEM_DESCRIPTION
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());
    item.unit_of_measure = UNIT_OF_MEASURE
        .captures(fragment)
        .map(|caps| caps[1].to_uppercase());
    item.vat_percent = VAT_PERCENT
        .captures(fragment)
        .map(|caps| format!("{}%", &caps[1]));

    let decimals: Vec<String> = DECIMAL_TOKEN
        .find_iter(fragment)
        .map(|m| m.as_str().to_string())
        .collect();

    // Columns are assigned by position. Fewer than five decimals only fill
    // quantity and unit rate.
    match decimals.len() {
        n if n >= 5 => {
            let mut values = decimals.into_iter();
            item.quantity = values.next();
            item.unit_rate = values.next();
            item.total_excl_vat = values.next();
            item.vat_amount = values.next();
            item.total_incl_vat = values.next();
        }
        2..=4 => {
            let mut values = decimals.into_iter();
            item.quantity = values.next();
            item.unit_rate = values.next();
        }
        _ => {}
    }

    trace!(serial, code, "row parsed");
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wrapped_row_under_sales_header() {
        let items = LineItemExtractor::new().extract(&lines(&[
            "Sales Person Payment Terms",
            "A1234567890",
            "Item 1.000 2.500 2.500 0.125 2.625",
            "Total Number",
            "B1234567890 Item 9.000 9.000",
        ]));

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.serial_number, "1");
        assert_eq!(item.item_code, "A1234567890");
        assert_eq!(item.quantity.as_deref(), Some("1.000"));
        assert_eq!(item.unit_rate.as_deref(), Some("2.500"));
        assert_eq!(item.total_incl_vat.as_deref(), Some("2.625"));
    }

    #[test]
    fn test_full_row_columns() {
        let item = parse_row_fragment(
            "1 A1234567890 UPVC PIPE 110MM PN10 6M 1234 EA 5% 1.0 2.0 3.0 4.0 5.0",
            1,
        )
        .unwrap();

        assert_eq!(item.description.as_deref(), Some("UPVC PIPE 110MM PN10 6M"));
        assert_eq!(item.unit_of_measure.as_deref(), Some("EA"));
        assert_eq!(item.vat_percent.as_deref(), Some("5%"));
        assert_eq!(item.quantity.as_deref(), Some("1.0"));
        assert_eq!(item.unit_rate.as_deref(), Some("2.0"));
        assert_eq!(item.total_excl_vat.as_deref(), Some("3.0"));
        assert_eq!(item.vat_amount.as_deref(), Some("4.0"));
        assert_eq!(item.total_incl_vat.as_deref(), Some("5.0"));
    }

    #[test]
    fn test_partial_numeric_columns() {
        let item = parse_row_fragment("A1234567890 ELBOW 90 pc 3.000 1.750 5.250", 2).unwrap();

        assert_eq!(item.serial_number, "2");
        assert_eq!(item.unit_of_measure.as_deref(), Some("PC"));
        assert_eq!(item.quantity.as_deref(), Some("3.000"));
        assert_eq!(item.unit_rate.as_deref(), Some("1.750"));
        assert_eq!(item.total_excl_vat, None);

        let bare = parse_row_fragment("A1234567890 ELBOW 3.000", 1).unwrap();
        assert_eq!(bare.quantity, None);
        assert_eq!(bare.unit_rate, None);
    }

    #[test]
    fn test_row_without_item_code_is_dropped() {
        assert!(parse_row_fragment("PVC PIPE EA 1.000 2.000", 1).is_none());
        assert!(parse_row_fragment("a1234567890 PVC PIPE", 1).is_none());

        let items = LineItemExtractor::new().extract(&lines(&[
            "S.No Item Code Description Qty",
            "1 PVC PIPE EA 1.000 2.000",
            "Total 2.000",
        ]));
        assert!(items.is_empty());
    }

    #[test]
    fn test_serials_follow_encounter_order() {
        let items = LineItemExtractor::new().extract(&lines(&[
            "S.No Item Code Description U.O.M Qty",
            "Unit Price VAT Amount",
            "7 A1000000001 PVC TEE EA 1.000 2.000",
            "3 A1000000002 PVC CAP EA 1.000 2.000",
            "9 A1000000003 PVC PLUG EA",
            "1.000 2.000",
            "Sub Total 6.000",
        ]));

        let serials: Vec<&str> = items.iter().map(|i| i.serial_number.as_str()).collect();
        let codes: Vec<&str> = items.iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(serials, vec!["1", "2", "3"]);
        assert_eq!(codes, vec!["A1000000001", "A1000000002", "A1000000003"]);
        assert_eq!(items[2].quantity.as_deref(), Some("1.000"));
    }

    #[test]
    fn test_continuation_stops_at_footer() {
        let items = LineItemExtractor::new().extract(&lines(&[
            "Qty",
            "A1234567890 PVC PIPE EA 1.000 2.000",
            "Grand Total 2.000 9.000 9.000",
        ]));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total_excl_vat, None);
    }

    #[test]
    fn test_header_naming_total_columns() {
        let items = LineItemExtractor::new().extract(&lines(&[
            "Sales Person Payment Terms Ship Date",
            "RAHUL.MENON 60 Days 12JAN2026",
            "S.No Item Code Description UOM Qty Rate Total Excl VAT VAT Amount Total Incl VAT",
            "1 A1234567890 UPVC PIPE 110MM EA 10.000 2.500 25.000 1.250 26.250",
            "Sub Total 25.000",
        ]));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_code, "A1234567890");
        assert_eq!(items[0].total_excl_vat.as_deref(), Some("25.000"));
        assert_eq!(items[0].total_incl_vat.as_deref(), Some("26.250"));
    }

    #[test]
    fn test_wrapped_header_with_total_columns() {
        let items = LineItemExtractor::new().extract(&lines(&[
            "S.No Item Code Description UOM Qty Unit Rate",
            "Total Excl VAT VAT% VAT Amount Total Incl VAT",
            "1 A1234567890 PVC ELBOW EA 4.000 1.000 4.000 0.200 4.200",
            "2 B2345678901 PVC TEE EA 1.000 1.000 1.000 0.050 1.050",
            "Total 5.000",
            "C3456789012 PVC CAP EA 1.000 1.000",
        ]));

        let codes: Vec<&str> = items.iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A1234567890", "B2345678901"]);
        assert_eq!(items[1].vat_amount.as_deref(), Some("0.050"));
    }

    #[test]
    fn test_no_header_no_items() {
        let items = LineItemExtractor::new().extract(&lines(&["A1234567890 PVC PIPE 1.0 2.0"]));
        assert!(items.is_empty());
    }
}
