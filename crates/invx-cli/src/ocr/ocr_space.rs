//! OCR.space HTTP API client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use invx_core::models::config::OcrConfig;
use invx_core::{OcrDocument, OcrError};

/// Confidence reported for OCR.space output; the API does not return one.
const OCR_SPACE_CONFIDENCE: f32 = 90.0;

/// OCR.space client.
pub struct OcrSpaceClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    engine: u8,
    detect_tables: bool,
    detect_orientation: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    error_message: Option<Messages>,
    #[serde(default)]
    is_errored_on_processing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

/// The API sends either a single message or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(message) => vec![message],
            Self::Many(messages) => messages,
        }
    }
}

impl OcrSpaceClient {
    /// Build a client. Fails when no API key is configured.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        Self::with_api_key(config, config.resolved_api_key())
    }

    /// Build a client with an already resolved API key.
    fn with_api_key(config: &OcrConfig, api_key: Option<String>) -> Result<Self, OcrError> {
        let api_key = api_key.ok_or_else(|| {
            OcrError::BackendNotAvailable(
                "OCR.space API key missing (set ocr.api_key or OCR_SPACE_API_KEY)".to_string(),
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            engine: config.ocr_space_engine,
            detect_tables: config.detect_tables,
            detect_orientation: config.detect_orientation,
        })
    }

    /// Upload an image and return the first parsed page.
    pub async fn recognize(&self, image_path: &Path) -> Result<OcrDocument, OcrError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| OcrError::InvalidInput(format!("{}: {}", image_path.display(), e)))?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("apikey", self.api_key.clone())
            .text("OCREngine", self.engine.to_string())
            .text("isTable", self.detect_tables.to_string())
            .text("detectOrientation", self.detect_orientation.to_string());

        debug!("Uploading {} to {}", image_path.display(), self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(OcrError::Request(format!("HTTP {}: {}", status, body.trim())));
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<OcrDocument, OcrError> {
    let response: OcrSpaceResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::Request(format!("invalid response: {}", e)))?;

    if let Some(first) = response.parsed_results.and_then(|r| r.into_iter().next()) {
        return Ok(OcrDocument::new(first.parsed_text).with_confidence(OCR_SPACE_CONFIDENCE));
    }

    let messages = response.error_message.map(Messages::into_vec).unwrap_or_default();
    if !messages.is_empty() || response.is_errored_on_processing {
        return Err(OcrError::Service(messages));
    }

    // Nothing parsed and nothing reported: treat as an empty page.
    Ok(OcrDocument::new(String::new()).with_confidence(OCR_SPACE_CONFIDENCE))
}
