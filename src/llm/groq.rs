//! Groq chat-completions HTTP client (OpenAI-compatible wire format).
//!
//! All pipeline stages share one client instance; the model name is
//! resolved once from configuration rather than passed per call.

use serde::{Deserialize, Serialize};

use super::types::{ChatClient, ChatMessage, GenerationOptions};
use super::LlmError;

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// The model name sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// Response body from POST /chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatClient for GroqClient {
    fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .map(|c| c.message.content)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Role;

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = GroqClient::new("https://api.groq.com/openai/v1/", "key", "m", 60);
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn constructor_keeps_model() {
        let client = GroqClient::new("http://localhost", "key", "llama-3.1-70b-versatile", 60);
        assert_eq!(client.model(), "llama-3.1-70b-versatile");
    }

    #[test]
    fn request_body_wire_format() {
        let messages = vec![
            ChatMessage::system("you are helpful"),
            ChatMessage::user("hello"),
        ];
        let body = ChatCompletionRequest {
            model: "llama-3.1-70b-versatile",
            messages: &messages,
            temperature: 0.3,
            max_tokens: 100,
            top_p: 1.0,
            stream: false,
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "llama-3.1-70b-versatile");
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn response_parses_choices_in_order() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let contents: Vec<String> = parsed
            .choices
            .into_iter()
            .map(|c| c.message.content)
            .collect();
        assert_eq!(contents, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn response_tolerates_zero_choices() {
        let parsed: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn message_roles_round_trip() {
        let raw = r#"{"role": "assistant", "content": "x"}"#;
        let msg: ChatMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.role, Role::Assistant);
    }
}
