//! Extraction pipeline combining the scalar field cascades and the table parser.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{InvoiceExtractionResult, OcrDocument};

use super::normalize::NormalizedText;
use super::rules::{
    CompanyNameExtractor, DateExtractor, DoNumberExtractor, ExtractionContext, FieldExtractor,
    InvoiceNumberExtractor, PaymentTermsExtractor, SalesPersonExtractor, ShipDateExtractor,
    SoNumberExtractor, TrnExtractor,
};
use super::table::LineItemExtractor;
use super::{InvoiceExtractor, Result};

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: InvoiceExtractionResult,
    /// Confidence reported by the OCR engine, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice from recognized text.
    fn parse(&self, document: &OcrDocument) -> Result<ExtractionResult>;
}

/// Runs every field extractor and the table extractor over one document.
pub struct InvoicePipeline {
    /// Scalar extractors in evaluation order. The date runs before the ship
    /// date, which reads it from the context.
    extractors: Vec<Box<dyn FieldExtractor>>,
    table: LineItemExtractor,
}

impl InvoicePipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    /// Create a pipeline from extraction settings.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        let extractors: Vec<Box<dyn FieldExtractor>> = vec![
            Box::new(CompanyNameExtractor::with_scan_lines(config.company_scan_lines)),
            Box::new(InvoiceNumberExtractor::new()),
            Box::new(DateExtractor::new()),
            Box::new(TrnExtractor::new()),
            Box::new(SalesPersonExtractor::new()),
            Box::new(PaymentTermsExtractor::new()),
            Box::new(ShipDateExtractor::with_scan_lines(config.ship_date_scan_lines)),
            Box::new(DoNumberExtractor::new()),
            Box::new(SoNumberExtractor::new()),
        ];

        Self {
            extractors,
            table: LineItemExtractor::new(),
        }
    }

    fn run(&self, text: &NormalizedText) -> InvoiceExtractionResult {
        let mut result = InvoiceExtractionResult::default();

        for extractor in &self.extractors {
            let value = extractor.extract(&ExtractionContext {
                text,
                found: &result,
            });
            result.set_field(extractor.field(), value);
        }

        result.line_items = self.table.extract(text.lines());
        result
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for InvoicePipeline {
    fn parse(&self, document: &OcrDocument) -> Result<ExtractionResult> {
        let start = Instant::now();

        if document.is_blank() {
            warn!("OCR returned no text");
            return Err(ExtractionError::NoText);
        }

        info!("Extracting invoice from {} characters of text", document.text.len());

        let text = NormalizedText::new(&document.text);
        if text.is_empty() {
            warn!("OCR text contained only noise");
            return Err(ExtractionError::NoText);
        }

        let invoice = self.run(&text);

        let mut warnings: Vec<String> = invoice
            .missing_fields()
            .into_iter()
            .map(|field| format!("Could not extract {}", field.label().to_lowercase()))
            .collect();
        if invoice.line_items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        debug!(
            "Extracted invoice {} with {} line items, {} warnings",
            invoice.invoice_number,
            invoice.line_items.len(),
            warnings.len()
        );

        Ok(ExtractionResult {
            invoice,
            ocr_confidence: document.confidence,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl InvoiceExtractor for InvoicePipeline {
    fn extract(&self, document: &OcrDocument) -> Result<InvoiceExtractionResult> {
        self.parse(document).map(|r| r.invoice)
    }

    fn extract_from_text(&self, text: &str) -> Result<InvoiceExtractionResult> {
        self.extract(&OcrDocument::new(text))
    }
}
