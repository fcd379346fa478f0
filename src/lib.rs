pub mod config;
pub mod llm;
pub mod search;
pub mod pipeline;
pub mod uploads;

pub use config::AppConfig;
pub use pipeline::{Consultation, Orchestrator, ProcessError, RemedyCategory, RemedyEntry};

use std::sync::Arc;

use llm::GroqClient;
use pipeline::OcrSpaceClient;
use search::SerpApiImageSearch;

/// Wire the production service clients from configuration.
pub fn build_orchestrator(config: &AppConfig) -> Orchestrator {
    let chat = GroqClient::new(
        &config.llm.base_url,
        &config.llm.api_key,
        &config.llm.model,
        config.llm.timeout_secs,
    );
    let images = SerpApiImageSearch::new(
        &config.image_search.base_url,
        config.image_search.api_key.as_deref(),
        config.image_search.timeout_secs,
    );
    let extractor = OcrSpaceClient::new(
        &config.ocr.endpoint,
        &config.ocr.api_key,
        config.ocr.timeout_secs,
    );

    Orchestrator::new(Arc::new(chat), Arc::new(images), Arc::new(extractor))
}
