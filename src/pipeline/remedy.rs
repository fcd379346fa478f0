//! Remedy fetcher — one completion per (condition, category) pair.
//!
//! Never fails the caller: both the zero-choice and the service-error
//! outcomes degrade to category-labeled placeholder strings, so the
//! orchestrator's fan-in barrier always receives a description for every
//! category.

use super::types::RemedyCategory;
use crate::llm::{ChatClient, ChatMessage, GenerationOptions};

/// Fetch a remedy description for a condition in one category.
pub fn fetch_remedy(client: &dyn ChatClient, condition: &str, category: RemedyCategory) -> String {
    let system = format!(
        "You are an expert in {category} remedies. Provide detailed and accurate information."
    );
    let prompt = format!(
        "Provide a detailed {category} remedy for {condition}. \
         Include specific ingredients or treatments."
    );
    let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];
    let options = GenerationOptions::new(0.5, 200);

    match client.chat(&messages, &options) {
        Ok(choices) => match choices.first() {
            Some(content) => content.trim().to_string(),
            None => format!("No {category} remedy found"),
        },
        Err(e) => {
            tracing::warn!(category = %category, error = %e, "Remedy fetch failed");
            format!("Error in getting {category} remedy")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatClient;

    #[test]
    fn returns_trimmed_description() {
        let client = MockChatClient::fixed("  Ginger tea with honey.  ");
        let description = fetch_remedy(&client, "Bronchitis", RemedyCategory::Home);
        assert_eq!(description, "Ginger tea with honey.");
    }

    #[test]
    fn zero_choices_yield_category_placeholder() {
        let client = MockChatClient::empty();
        let description = fetch_remedy(&client, "Bronchitis", RemedyCategory::Ayurvedic);
        assert_eq!(description, "No Ayurvedic remedy found");
    }

    #[test]
    fn service_error_yields_category_placeholder() {
        let client = MockChatClient::failing();
        let description = fetch_remedy(&client, "Bronchitis", RemedyCategory::Homeopathic);
        assert_eq!(description, "Error in getting homeopathic remedy");
    }

    #[test]
    fn every_category_produces_a_value_on_error() {
        let client = MockChatClient::failing();
        for category in RemedyCategory::ALL {
            let description = fetch_remedy(&client, "Migraine", category);
            assert!(description.contains(category.as_str()));
        }
    }
}
