//! Rendering of extraction results.

use invx_core::{InvoiceExtractionResult, InvoiceField, LineItem};

/// Output format for extraction results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (line items)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

const ITEM_COLUMNS: [&str; 10] = [
    "serial_number",
    "item_code",
    "description",
    "unit_of_measure",
    "vat_percent",
    "quantity",
    "unit_rate",
    "total_excl_vat",
    "vat_amount",
    "total_incl_vat",
];

pub fn format_result(result: &InvoiceExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(&result.line_items),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn item_record(item: &LineItem) -> [&str; 10] {
    [
        &item.serial_number,
        &item.item_code,
        opt(&item.description),
        opt(&item.unit_of_measure),
        opt(&item.vat_percent),
        opt(&item.quantity),
        opt(&item.unit_rate),
        opt(&item.total_excl_vat),
        opt(&item.vat_amount),
        opt(&item.total_incl_vat),
    ]
}

fn format_csv(items: &[LineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(ITEM_COLUMNS)?;
    for item in items {
        wtr.write_record(item_record(item))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &InvoiceExtractionResult) -> String {
    let mut output = String::new();

    for field in InvoiceField::ALL {
        output.push_str(&format!("{:<15} {}\n", format!("{}:", field.label()), result.field(field)));
    }
    output.push('\n');

    if result.line_items.is_empty() {
        output.push_str("No line items found\n");
        return output;
    }

    output.push_str(&format!("Line items ({}):\n", result.line_items.len()));
    for item in &result.line_items {
        output.push_str(&format!(
            "  {:>3}  {:<12} {:<30} {:>5} {:>10} {:>10} {:>12}\n",
            item.serial_number,
            item.item_code,
            item.description.as_deref().unwrap_or("-"),
            item.unit_of_measure.as_deref().unwrap_or("-"),
            item.quantity.as_deref().unwrap_or("-"),
            item.unit_rate.as_deref().unwrap_or("-"),
            item.total_incl_vat.as_deref().unwrap_or("-"),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use invx_core::FieldResult;
    use pretty_assertions::assert_eq;

    fn sample() -> InvoiceExtractionResult {
        let mut item = LineItem::new(1, "A1234567890");
        item.description = Some("PVC PIPE, 20MM".to_string());
        item.quantity = Some("1.000".to_string());

        InvoiceExtractionResult {
            invoice_number: FieldResult::found("9012345678"),
            line_items: vec![item],
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_lists_items_with_blank_unset_columns() {
        let csv = format_result(&sample(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], ITEM_COLUMNS.join(","));
        assert_eq!(lines[1], "1,A1234567890,\"PVC PIPE, 20MM\",,,1.000,,,,");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_json_uses_sentinel_and_camel_case() {
        let json = format_result(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["invoiceNumber"], "9012345678");
        assert_eq!(value["companyName"], "N/A");
        assert_eq!(value["lineItems"][0]["itemCode"], "A1234567890");
        assert!(value["lineItems"][0].get("unitRate").is_none());
    }

    #[test]
    fn test_text_summary() {
        let text = format_result(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("Invoice No:"));
        assert!(text.contains("9012345678"));
        assert!(text.contains("Line items (1):"));

        let empty = format_result(&InvoiceExtractionResult::default(), OutputFormat::Text).unwrap();
        assert!(empty.contains("No line items found"));
    }
}
