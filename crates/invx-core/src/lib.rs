//! Core library for scanned invoice field extraction.
//!
//! This crate provides:
//! - OCR noise normalization (flat and line-preserving)
//! - Rule cascades for scalar invoice fields (company, invoice number,
//!   dates, TRN, sales person, payment terms, DO/SO numbers)
//! - A line-item table parser
//! - Configuration for OCR acquisition and extraction
//!
//! Text recognition itself happens elsewhere; this crate starts from an
//! [`OcrDocument`].

pub mod error;
pub mod invoice;
pub mod models;

pub use error::{ExtractionError, InvxError, OcrError, Result};
pub use invoice::{ExtractionResult, InvoiceExtractor, InvoiceParser, InvoicePipeline};
pub use models::config::{ExtractionConfig, InvxConfig, OcrBackendKind, OcrConfig};
pub use models::invoice::{FieldResult, InvoiceExtractionResult, InvoiceField, LineItem, OcrDocument};
