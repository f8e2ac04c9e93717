//! Invoice extraction data models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text recognized from one invoice image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Raw recognized text, any line-ending convention.
    pub text: String,

    /// Engine confidence in [0, 100], if the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl OcrDocument {
    /// Create a document without a confidence score.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// Attach an engine confidence, clamped to [0, 100].
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 100.0));
        self
    }

    /// True when the engine returned nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Value of a single scalar field.
///
/// Serializes as the found string, or as the `"N/A"` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldResult(Option<String>);

impl FieldResult {
    /// Sentinel used for fields that were not found.
    pub const NOT_FOUND: &'static str = "N/A";

    pub fn found(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn not_found() -> Self {
        Self(None)
    }

    pub fn is_found(&self) -> bool {
        self.0.is_some()
    }

    /// The found value, `None` for the sentinel.
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The found value or `"N/A"`.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(Self::NOT_FOUND)
    }
}

impl From<Option<String>> for FieldResult {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value == Self::NOT_FOUND {
            Ok(Self::not_found())
        } else {
            Ok(Self::found(value))
        }
    }
}

/// Scalar fields read from the invoice header area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    CompanyName,
    InvoiceNumber,
    Date,
    Trn,
    SalesPerson,
    PaymentTerms,
    ShipDate,
    DoNumber,
    SoNumber,
}

impl InvoiceField {
    /// All fields, in pipeline order.
    pub const ALL: [InvoiceField; 9] = [
        InvoiceField::CompanyName,
        InvoiceField::InvoiceNumber,
        InvoiceField::Date,
        InvoiceField::Trn,
        InvoiceField::SalesPerson,
        InvoiceField::PaymentTerms,
        InvoiceField::ShipDate,
        InvoiceField::DoNumber,
        InvoiceField::SoNumber,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CompanyName => "Company Name",
            Self::InvoiceNumber => "Invoice No",
            Self::Date => "Date",
            Self::Trn => "TRN",
            Self::SalesPerson => "Sales Person",
            Self::PaymentTerms => "Payment Terms",
            Self::ShipDate => "Ship Date",
            Self::DoNumber => "D.O. Number",
            Self::SoNumber => "S.O. Number",
        }
    }

    /// Column key used in tabular exports.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::InvoiceNumber => "invoice_number",
            Self::Date => "date",
            Self::Trn => "trn",
            Self::SalesPerson => "sales_person",
            Self::PaymentTerms => "payment_terms",
            Self::ShipDate => "ship_date",
            Self::DoNumber => "do_number",
            Self::SoNumber => "so_number",
        }
    }
}

impl fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed row of the item table.
///
/// Numeric columns stay as the strings OCR produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 1-based position among accepted rows.
    pub serial_number: String,

    /// Product code, e.g. `A1234567890`.
    pub item_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_percent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_rate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_excl_vat: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_incl_vat: Option<String>,
}

impl LineItem {
    /// Create a row with only the required code set.
    pub fn new(serial_number: usize, item_code: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.to_string(),
            item_code: item_code.into(),
            ..Default::default()
        }
    }
}

/// Everything extracted from one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceExtractionResult {
    pub company_name: FieldResult,
    pub invoice_number: FieldResult,
    pub date: FieldResult,
    pub trn: FieldResult,
    pub sales_person: FieldResult,
    pub payment_terms: FieldResult,
    pub ship_date: FieldResult,
    pub do_number: FieldResult,
    pub so_number: FieldResult,

    /// Table rows in source order.
    pub line_items: Vec<LineItem>,
}

impl InvoiceExtractionResult {
    /// Get a scalar field.
    pub fn field(&self, field: InvoiceField) -> &FieldResult {
        match field {
            InvoiceField::CompanyName => &self.company_name,
            InvoiceField::InvoiceNumber => &self.invoice_number,
            InvoiceField::Date => &self.date,
            InvoiceField::Trn => &self.trn,
            InvoiceField::SalesPerson => &self.sales_person,
            InvoiceField::PaymentTerms => &self.payment_terms,
            InvoiceField::ShipDate => &self.ship_date,
            InvoiceField::DoNumber => &self.do_number,
            InvoiceField::SoNumber => &self.so_number,
        }
    }

    /// Set a scalar field.
    pub fn set_field(&mut self, field: InvoiceField, value: FieldResult) {
        let slot = match field {
            InvoiceField::CompanyName => &mut self.company_name,
            InvoiceField::InvoiceNumber => &mut self.invoice_number,
            InvoiceField::Date => &mut self.date,
            InvoiceField::Trn => &mut self.trn,
            InvoiceField::SalesPerson => &mut self.sales_person,
            InvoiceField::PaymentTerms => &mut self.payment_terms,
            InvoiceField::ShipDate => &mut self.ship_date,
            InvoiceField::DoNumber => &mut self.do_number,
            InvoiceField::SoNumber => &mut self.so_number,
        };
        *slot = value;
    }

    /// Fields that fell back to the sentinel.
    pub fn missing_fields(&self) -> Vec<InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(|f| !self.field(*f).is_found())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_result_sentinel() {
        let missing = FieldResult::not_found();
        assert_eq!(missing.as_str(), "N/A");
        assert_eq!(missing.to_string(), "N/A");
        assert_eq!(missing.value(), None);

        let found = FieldResult::found("12345678");
        assert_eq!(found.as_str(), "12345678");
        assert!(found.is_found());
    }

    #[test]
    fn test_field_result_serializes_as_string() {
        let json = serde_json::to_string(&FieldResult::not_found()).unwrap();
        assert_eq!(json, "\"N/A\"");

        let back: FieldResult = serde_json::from_str("\"N/A\"").unwrap();
        assert!(!back.is_found());
    }

    #[test]
    fn test_default_result_is_fully_reset() {
        let result = InvoiceExtractionResult::default();
        assert_eq!(result.missing_fields().len(), InvoiceField::ALL.len());
        assert!(result.line_items.is_empty());
    }

    #[test]
    fn test_line_item_skips_unset_columns() {
        let mut item = LineItem::new(1, "A1234567890");
        item.quantity = Some("1.000".to_string());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["serialNumber"], "1");
        assert_eq!(json["itemCode"], "A1234567890");
        assert_eq!(json["quantity"], "1.000");
        assert!(json.get("unitRate").is_none());
    }

    #[test]
    fn test_set_field() {
        let mut result = InvoiceExtractionResult::default();
        result.set_field(InvoiceField::Trn, FieldResult::found("100123456700003"));
        assert_eq!(result.trn.as_str(), "100123456700003");
        assert!(!result.missing_fields().contains(&InvoiceField::Trn));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let doc = OcrDocument::new("x").with_confidence(140.0);
        assert_eq!(doc.confidence, Some(100.0));
        assert!(OcrDocument::new(" \r\n\t").is_blank());
    }
}
