//! Consultation orchestrator.
//!
//! Coordinates: validate → extract (document input only) → identify →
//! concurrent remedy/image fan-out → review → assemble.
//!
//! The remedy and image adapters are fail-soft, so the 8-task barrier
//! always completes with a fully populated category map; the earlier
//! stages are fail-hard and abort the request with a single typed
//! failure. No error and no worker panic escapes `process`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;

use super::extraction::TextExtractor;
use super::identify::{identify_condition, is_unidentified};
use super::remedy::fetch_remedy;
use super::review::review_answer;
use super::types::{Consultation, ProcessError, RemedyCategory, RemedyEntry};
use crate::llm::ChatClient;
use crate::search::{search_remedy_images, ImageSearchClient};

/// Images requested per remedy category.
pub const DEFAULT_IMAGES_PER_REMEDY: usize = 3;

/// The orchestration core. Constructed once with shared client handles
/// and reused across requests.
pub struct Orchestrator {
    chat: Arc<dyn ChatClient>,
    images: Arc<dyn ImageSearchClient>,
    extractor: Arc<dyn TextExtractor>,
    images_per_remedy: usize,
}

impl Orchestrator {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        images: Arc<dyn ImageSearchClient>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            chat,
            images,
            extractor,
            images_per_remedy: DEFAULT_IMAGES_PER_REMEDY,
        }
    }

    pub fn with_images_per_remedy(mut self, count: usize) -> Self {
        self.images_per_remedy = count;
        self
    }

    /// Process one consultation request.
    ///
    /// Exactly one of `query` / `document` is expected; when both are
    /// supplied the document wins. The external service clients are
    /// blocking, so every adapter call runs on the blocking pool.
    pub async fn process(
        &self,
        query: Option<&str>,
        document: Option<&Path>,
    ) -> Result<Consultation, ProcessError> {
        // Validating
        let text_source = match (query, document) {
            (_, Some(path)) => TextSource::Document(path.to_path_buf()),
            (Some(text), None) if !text.trim().is_empty() => TextSource::Query(text.to_string()),
            _ => return Err(ProcessError::NoInput),
        };

        // IdentifyingCondition
        let condition = self.identify(text_source).await?;
        tracing::info!(condition = %condition, "Condition identified");

        // FetchingRemedies: one remedy task and one image task per
        // category, full barrier before merging.
        let remedy_tasks: Vec<_> = RemedyCategory::ALL
            .iter()
            .map(|&category| {
                let chat = Arc::clone(&self.chat);
                let condition = condition.clone();
                tokio::task::spawn_blocking(move || {
                    fetch_remedy(chat.as_ref(), &condition, category)
                })
            })
            .collect();

        let image_tasks: Vec<_> = RemedyCategory::ALL
            .iter()
            .map(|&category| {
                let images = Arc::clone(&self.images);
                let query = format!("{condition} {category} remedy");
                let count = self.images_per_remedy;
                tokio::task::spawn_blocking(move || {
                    search_remedy_images(images.as_ref(), &query, count)
                })
            })
            .collect();

        let descriptions = join_all(remedy_tasks).await;
        let image_lists = join_all(image_tasks).await;

        let mut remedies = BTreeMap::new();
        for ((category, description), images) in RemedyCategory::ALL
            .iter()
            .zip(descriptions)
            .zip(image_lists)
        {
            remedies.insert(
                *category,
                RemedyEntry {
                    description: description.map_err(join_failure)?,
                    images: images.map_err(join_failure)?,
                },
            );
        }

        // Reviewing
        let combined = combined_remedy_text(&remedies);
        let chat = Arc::clone(&self.chat);
        let review_condition = condition.clone();
        let review = tokio::task::spawn_blocking(move || {
            review_answer(chat.as_ref(), &review_condition, &combined)
        })
        .await
        .map_err(join_failure)?;

        // Done
        Ok(Consultation {
            condition,
            remedies,
            review,
        })
    }

    /// Resolve the condition label, extracting document text first when
    /// the input is an image path.
    async fn identify(&self, source: TextSource) -> Result<String, ProcessError> {
        let text = match source {
            TextSource::Query(text) => text,
            TextSource::Document(path) => {
                let extractor = Arc::clone(&self.extractor);
                let extracted = tokio::task::spawn_blocking(move || extractor.extract(&path))
                    .await
                    .map_err(join_failure)?;
                match extracted {
                    Ok(text) if !text.is_empty() => text,
                    Ok(_) => return Err(ProcessError::ExtractionFailed),
                    Err(e) => {
                        tracing::warn!(error = %e, "Document text extraction failed");
                        return Err(ProcessError::ExtractionFailed);
                    }
                }
            }
        };

        let chat = Arc::clone(&self.chat);
        let condition = tokio::task::spawn_blocking(move || {
            identify_condition(chat.as_ref(), &text)
        })
        .await
        .map_err(join_failure)?;

        if is_unidentified(&condition) {
            return Err(ProcessError::NoCondition);
        }
        Ok(condition)
    }
}

enum TextSource {
    Query(String),
    Document(PathBuf),
}

/// Aggregate every category's description into the review input:
/// `"<category>_remedy:\n<description>"` blocks in category order,
/// blank-line separated.
fn combined_remedy_text(remedies: &BTreeMap<RemedyCategory, RemedyEntry>) -> String {
    remedies
        .iter()
        .map(|(category, entry)| format!("{}:\n{}", category.label(), entry.description))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A worker panic surfaces here as a join error; it is absorbed into the
/// generic boundary failure rather than propagating out of `process`.
fn join_failure(e: tokio::task::JoinError) -> ProcessError {
    tracing::error!(error = %e, "Consultation worker task failed");
    ProcessError::Internal(e.to_string())
}
