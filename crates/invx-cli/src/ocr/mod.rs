//! Text acquisition for the CLI.
//!
//! Images go to the configured OCR backend. `.txt` files are treated as
//! already-recognized text so extraction can run without an engine.

mod ocr_space;
mod tesseract;

use std::path::Path;

use tracing::debug;

use invx_core::models::config::{OcrBackendKind, OcrConfig};
use invx_core::{InvxError, OcrDocument, OcrError};

pub use ocr_space::OcrSpaceClient;
pub use tesseract::TesseractBackend;

/// Image extensions handed to an OCR backend.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"];

/// What kind of input a path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Already-recognized text.
    PlainText,
    /// An image needing OCR.
    Image,
}

impl InputKind {
    /// Classify a path by extension.
    pub fn from_path(path: &Path) -> Result<Self, OcrError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(Self::PlainText),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Ok(Self::Image),
            ext => Err(OcrError::InvalidInput(format!(
                "unsupported file format: {}",
                if ext.is_empty() { "<none>" } else { ext }
            ))),
        }
    }
}

/// Turns input files into [`OcrDocument`]s.
pub struct Recognizer {
    config: OcrConfig,
}

impl Recognizer {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Recognize one input file.
    pub async fn recognize(&self, path: &Path) -> Result<OcrDocument, InvxError> {
        match InputKind::from_path(path)? {
            InputKind::PlainText => {
                debug!("Reading recognized text from {}", path.display());
                let text = tokio::fs::read_to_string(path).await?;
                Ok(OcrDocument::new(text))
            }
            InputKind::Image => match self.config.backend {
                OcrBackendKind::Tesseract => {
                    Ok(TesseractBackend::new(&self.config).recognize(path).await?)
                }
                OcrBackendKind::OcrSpace => {
                    Ok(OcrSpaceClient::new(&self.config)?.recognize(path).await?)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_from_extension() {
        assert_eq!(InputKind::from_path(Path::new("a.TXT")).unwrap(), InputKind::PlainText);
        assert_eq!(InputKind::from_path(Path::new("scan.jpeg")).unwrap(), InputKind::Image);
        assert!(matches!(
            InputKind::from_path(Path::new("invoice.docx")),
            Err(OcrError::InvalidInput(_))
        ));
        assert!(InputKind::from_path(Path::new("noext")).is_err());
    }

    #[tokio::test]
    async fn test_plain_text_has_no_confidence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        std::fs::write(&path, "TAX INVOICE\nInvoice No: 9012345678").unwrap();

        let document = Recognizer::new(OcrConfig::default()).recognize(&path).await.unwrap();
        assert_eq!(document.confidence, None);
        assert!(document.text.contains("9012345678"));
    }
}
