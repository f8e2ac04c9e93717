//! Invoice field extraction module.

pub mod normalize;
mod parser;
pub mod rules;
pub mod table;

pub use normalize::{normalize_flat, normalize_lines, NormalizedText};
pub use parser::{ExtractionResult, InvoiceParser, InvoicePipeline};
pub use rules::{reformat_ship_date, ExtractionContext, FieldExtractor};
pub use table::{LineItemExtractor, TableState};

use crate::error::ExtractionError;
use crate::models::invoice::{InvoiceExtractionResult, OcrDocument};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice extractors.
pub trait InvoiceExtractor {
    /// Extract invoice data from an OCR document.
    fn extract(&self, document: &OcrDocument) -> Result<InvoiceExtractionResult>;

    /// Extract invoice data from plain text.
    fn extract_from_text(&self, text: &str) -> Result<InvoiceExtractionResult>;
}
