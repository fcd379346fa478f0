//! Text extraction adapter — pulls raw text out of a scanned document
//! image via an external OCR service.
//!
//! The adapter reports transport and processing failures distinctly; the
//! orchestrator treats both, plus an empty result, as the same terminal
//! extraction failure.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR service unreachable: {0}")]
    Transport(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// Trait for the external OCR service.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, image_path: &Path) -> Result<String, ExtractionError>;
}

// ──────────────────────────────────────────────
// OcrSpaceClient
// ──────────────────────────────────────────────

/// Fixed OCR options sent with every request.
const OCR_LANGUAGE: &str = "eng";
const OCR_ENGINE: &str = "2";

/// Production OCR adapter for the OCR.space parse API.
///
/// Sends the raw image bytes as multipart content with a flat option set
/// and space-joins the per-page parsed text fragments in returned order.
pub struct OcrSpaceClient {
    endpoint: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OcrSpaceClient {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }
}

/// Response body from the OCR parse endpoint.
#[derive(Deserialize)]
struct OcrParseResponse {
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<serde_json::Value>,
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<OcrParsedResult>,
}

#[derive(Deserialize)]
struct OcrParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

impl OcrParseResponse {
    /// The service reports errors as either a string or an array of
    /// strings; render both to one message.
    fn error_text(&self) -> String {
        match &self.error_message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(parts)) => parts
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => "Unknown error".to_string(),
        }
    }
}

impl TextExtractor for OcrSpaceClient {
    fn extract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(image_path)?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        tracing::debug!(
            path = %image_path.display(),
            size = bytes.len(),
            "Submitting document for OCR"
        );

        let part = reqwest::blocking::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::blocking::multipart::Form::new()
            .text("apikey", self.api_key.clone())
            .text("language", OCR_LANGUAGE)
            .text("OCREngine", OCR_ENGINE)
            .text("isOverlayRequired", "false")
            .part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Transport(format!(
                "status {}",
                status.as_u16()
            )));
        }

        let parsed: OcrParseResponse = response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        if parsed.is_errored_on_processing {
            return Err(ExtractionError::Processing(parsed.error_text()));
        }

        let text = parsed
            .parsed_results
            .iter()
            .map(|page| page.parsed_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(text.trim().to_string())
    }
}

// ──────────────────────────────────────────────
// MockTextExtractor (testing)
// ──────────────────────────────────────────────

/// Mock extractor returning configured text, or a processing error.
pub struct MockTextExtractor {
    text: Option<String>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockTextExtractor {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of extraction calls issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl TextExtractor for MockTextExtractor {
    fn extract(&self, _image_path: &Path) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(ExtractionError::Processing("mock failure".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let client = OcrSpaceClient::new("https://api.ocr.space/parse/image", "key", 30);
        let result = client.extract(Path::new("/definitely/not/a/file.png"));
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }

    #[test]
    fn pages_join_space_separated_in_order() {
        let raw = r#"{
            "IsErroredOnProcessing": false,
            "ParsedResults": [
                {"ParsedText": "first page "},
                {"ParsedText": "second page"}
            ]
        }"#;
        let parsed: OcrParseResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .parsed_results
            .iter()
            .map(|p| p.parsed_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(text.trim(), "first page  second page");
    }

    #[test]
    fn processing_error_with_string_message() {
        let raw = r#"{
            "IsErroredOnProcessing": true,
            "ErrorMessage": "Unable to recognize the file type"
        }"#;
        let parsed: OcrParseResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.is_errored_on_processing);
        assert_eq!(parsed.error_text(), "Unable to recognize the file type");
    }

    #[test]
    fn processing_error_with_array_message() {
        let raw = r#"{
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Timed out waiting for results", "E101"]
        }"#;
        let parsed: OcrParseResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error_text(), "Timed out waiting for results; E101");
    }

    #[test]
    fn missing_error_message_renders_unknown() {
        let raw = r#"{"IsErroredOnProcessing": true}"#;
        let parsed: OcrParseResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error_text(), "Unknown error");
    }

    #[test]
    fn empty_parsed_results_yield_empty_text() {
        let raw = r#"{"IsErroredOnProcessing": false}"#;
        let parsed: OcrParseResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.parsed_results.is_empty());
    }

    #[test]
    fn mock_counts_calls() {
        let mock = MockTextExtractor::with_text("Patient presents with dry cough");
        mock.extract(Path::new("/tmp/a.png")).unwrap();
        mock.extract(Path::new("/tmp/b.png")).unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn failing_mock_returns_processing_error() {
        let mock = MockTextExtractor::failing();
        assert!(matches!(
            mock.extract(Path::new("/tmp/a.png")),
            Err(ExtractionError::Processing(_))
        ));
    }
}
