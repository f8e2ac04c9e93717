//! Configuration structures for OCR acquisition and extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InvxError;

/// Main configuration for the invx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Which OCR collaborator produces the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    /// Local `tesseract` binary.
    Tesseract,
    /// OCR.space HTTP API.
    OcrSpace,
}

impl Default for OcrBackendKind {
    fn default() -> Self {
        Self::Tesseract
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend used for image inputs.
    pub backend: OcrBackendKind,

    /// Recognition language.
    pub language: String,

    /// Path or name of the tesseract executable.
    pub tesseract_path: String,

    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,

    /// Characters tesseract is allowed to emit (empty = no restriction).
    pub char_whitelist: String,

    /// OCR.space endpoint.
    pub api_url: String,

    /// OCR.space API key. Falls back to `OCR_SPACE_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OCR.space engine number (1, 2 or 3).
    pub ocr_space_engine: u8,

    /// Ask OCR.space to keep table rows on one line.
    pub detect_tables: bool,

    /// Ask OCR.space to auto-rotate the image.
    pub detect_orientation: bool,

    /// Request timeout for remote OCR, in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::default(),
            language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            page_segmentation_mode: 3,
            char_whitelist:
                "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz .,/:()-%".to_string(),
            api_url: "https://api.ocr.space/parse/image".to_string(),
            api_key: None,
            ocr_space_engine: 2,
            detect_tables: true,
            detect_orientation: true,
            timeout_secs: 180,
        }
    }
}

impl OcrConfig {
    /// API key from config, or from the `OCR_SPACE_API_KEY` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var("OCR_SPACE_API_KEY").ok())
    }

    /// API key from config, or `fallback`. Blank keys count as missing.
    pub fn api_key_or(&self, fallback: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(fallback)
            .filter(|k| !k.trim().is_empty())
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How many leading lines the company-name heuristic inspects.
    pub company_scan_lines: usize,

    /// How many lines after the sales person / payment terms marker are
    /// searched for a ship date.
    pub ship_date_scan_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_scan_lines: 10,
            ship_date_scan_lines: 3,
        }
    }
}

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, InvxError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), InvxError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: InvxConfig =
            serde_json::from_str(r#"{ "extraction": { "company_scan_lines": 4 } }"#).unwrap();

        assert_eq!(config.extraction.company_scan_lines, 4);
        assert_eq!(config.extraction.ship_date_scan_lines, 3);
        assert_eq!(config.ocr, OcrConfig::default());
    }

    #[test]
    fn test_backend_kind_names() {
        let config: OcrConfig = serde_json::from_str(r#"{ "backend": "ocr_space" }"#).unwrap();
        assert_eq!(config.backend, OcrBackendKind::OcrSpace);
        assert_eq!(config.ocr_space_engine, 2);
        assert_eq!(config.timeout_secs, 180);
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = OcrConfig {
            api_key: Some("from-config".to_string()),
            ..OcrConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_blank_api_key_uses_fallback() {
        let config = OcrConfig {
            api_key: Some("  ".to_string()),
            ..OcrConfig::default()
        };
        assert_eq!(config.api_key_or(Some("from-env".to_string())).as_deref(), Some("from-env"));
        assert_eq!(config.api_key_or(Some(String::new())), None);
        assert_eq!(config.api_key_or(None), None);
    }
}
