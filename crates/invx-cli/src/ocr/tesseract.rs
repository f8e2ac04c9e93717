//! Tesseract OCR backend.
//!
//! Runs the `tesseract` command-line tool and reads the text from stdout.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use invx_core::models::config::OcrConfig;
use invx_core::{OcrDocument, OcrError};

/// Confidence reported for tesseract output; the CLI does not emit one.
const TESSERACT_CONFIDENCE: f32 = 85.0;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    binary: String,
    language: String,
    page_segmentation_mode: u8,
    char_whitelist: String,
}

impl TesseractBackend {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            language: config.language.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
            char_whitelist: config.char_whitelist.clone(),
        }
    }

    /// Command-line arguments after the binary name.
    fn args(&self, image_path: &Path) -> Vec<String> {
        let mut args = vec![
            image_path.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
            "-c".to_string(),
            "preserve_interword_spaces=1".to_string(),
        ];
        if !self.char_whitelist.is_empty() {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", self.char_whitelist));
        }
        args
    }

    /// Run tesseract on an image file.
    pub async fn recognize(&self, image_path: &Path) -> Result<OcrDocument, OcrError> {
        debug!("Running {} on {}", self.binary, image_path.display());

        let output = Command::new(&self.binary)
            .args(self.args(image_path))
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout).to_string();
                Ok(OcrDocument::new(text).with_confidence(TESSERACT_CONFIDENCE))
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Engine(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::BackendNotAvailable(
                format!("{} not found (install tesseract-ocr)", self.binary),
            )),
            Err(e) => Err(OcrError::Engine(e.to_string())),
        }
    }
}
