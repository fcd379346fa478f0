//! Condition identifier — distills free text (typed or OCR-extracted)
//! into a concise medical-condition label.
//!
//! This stage is fail-soft: a service failure becomes a sentinel string
//! rather than an error, and the orchestrator decides whether the
//! resulting label is usable via `is_unidentified`. The sentinel
//! spellings are compared case-insensitively downstream, so they live
//! here as the single source of truth.

use crate::llm::{ChatClient, ChatMessage, GenerationOptions};

/// Returned when the service produced no completion choices.
pub const NO_CONDITION_SENTINEL: &str = "No medical condition identified";

/// Returned when the completion call itself failed.
pub const IDENTIFY_ERROR_SENTINEL: &str = "Error in identifying medical condition";

const IDENTIFY_SYSTEM_PROMPT: &str =
    "You are a medical expert. Identify medical conditions or symptoms from the given text.";

/// Identify the medical condition or symptoms described in `text`.
///
/// Low temperature and a small token ceiling favor a short, deterministic
/// label over prose.
pub fn identify_condition(client: &dyn ChatClient, text: &str) -> String {
    let prompt = format!(
        "Identify the medical condition or symptoms from the following text. \
         Be specific and concise:\n\n{text}"
    );
    let messages = [
        ChatMessage::system(IDENTIFY_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ];
    let options = GenerationOptions::new(0.3, 100);

    match client.chat(&messages, &options) {
        Ok(choices) => match choices.first() {
            Some(content) => content.trim().to_string(),
            None => NO_CONDITION_SENTINEL.to_string(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Condition identification failed");
            IDENTIFY_ERROR_SENTINEL.to_string()
        }
    }
}

/// Whether a condition label means "nothing was identified".
///
/// True for the empty string and for the no-condition sentinel in any
/// letter case.
pub fn is_unidentified(condition: &str) -> bool {
    condition.is_empty() || condition.eq_ignore_ascii_case(NO_CONDITION_SENTINEL)
}
