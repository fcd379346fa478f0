//! Process-wide configuration, constructed once at startup and shared by
//! reference into every adapter.
//!
//! Environment variable names are part of the deployment contract:
//! `LLAMA_API` (completion service key, required), `OCR_API` (OCR key,
//! required only when document input is used), `SERP_API` (image search
//! key, optional — absence degrades image results to the empty list).

use std::path::PathBuf;

use thiserror::Error;

pub const APP_NAME: &str = "Remedia";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model served by the completion endpoint.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
const DEFAULT_SEARCH_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Completion service settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// OCR service settings. The key may be absent when only text queries are
/// used; extraction then fails at call time, not at startup.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Image search settings.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub ocr: OcrConfig,
    pub image_search: ImageSearchConfig,
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_key =
            std::env::var("LLAMA_API").map_err(|_| ConfigError::MissingVar("LLAMA_API"))?;

        Ok(Self {
            llm: LlmConfig {
                base_url: env_or("REMEDIA_LLM_URL", DEFAULT_LLM_BASE_URL),
                api_key: llm_key,
                model: env_or("REMEDIA_MODEL", DEFAULT_MODEL),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            ocr: OcrConfig {
                endpoint: env_or("REMEDIA_OCR_URL", DEFAULT_OCR_ENDPOINT),
                api_key: std::env::var("OCR_API").unwrap_or_default(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            image_search: ImageSearchConfig {
                base_url: env_or("REMEDIA_SEARCH_URL", DEFAULT_SEARCH_BASE_URL),
                api_key: std::env::var("SERP_API").ok(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Application data directory: ~/Remedia/ (user-visible).
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Directory holding at most one uploaded document at a time.
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,remedia=debug".to_string()
}
