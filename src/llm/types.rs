use serde::{Deserialize, Serialize};

use super::LlmError;

/// One turn of a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Sampling parameters for a single completion request.
///
/// Streaming is always off; every call site in the pipeline consumes the
/// full response at once.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl GenerationOptions {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
            top_p: 1.0,
        }
    }
}

/// Trait for the external chat-completion service.
///
/// Returns the content of every completion choice, in order. An empty
/// vector is a valid response (the service produced no choices) and is
/// distinct from an error.
pub trait ChatClient: Send + Sync {
    fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Vec<String>, LlmError>;
}

/// Mock chat client for testing — plays back a scripted sequence.
///
/// Each call pops the next scripted outcome; once the script is exhausted
/// the last outcome repeats. `calls()` exposes how many requests were
/// issued, which the orchestrator tests use to assert that failed requests
/// perform zero completion calls.
pub struct MockChatClient {
    script: std::sync::Mutex<Vec<ScriptedOutcome>>,
    calls: std::sync::atomic::AtomicUsize,
}

enum ScriptedOutcome {
    Choices(Vec<String>),
    Error,
}

impl MockChatClient {
    /// A client that always returns a single fixed choice.
    pub fn fixed(response: &str) -> Self {
        Self::from_outcomes(vec![ScriptedOutcome::Choices(vec![response.to_string()])])
    }

    /// A client that returns each response in turn, one choice per call.
    pub fn sequence(responses: &[&str]) -> Self {
        Self::from_outcomes(
            responses
                .iter()
                .map(|r| ScriptedOutcome::Choices(vec![(*r).to_string()]))
                .collect(),
        )
    }

    /// A client that returns zero choices on every call.
    pub fn empty() -> Self {
        Self::from_outcomes(vec![ScriptedOutcome::Choices(vec![])])
    }

    /// A client scripted with an explicit choices list per call, so a
    /// zero-choice response can appear mid-sequence.
    pub fn script(outcomes: Vec<Vec<String>>) -> Self {
        Self::from_outcomes(outcomes.into_iter().map(ScriptedOutcome::Choices).collect())
    }

    /// A client that fails every call with a connection error.
    pub fn failing() -> Self {
        Self::from_outcomes(vec![ScriptedOutcome::Error])
    }

    /// A client that answers the first call with one choice and fails
    /// every call after it.
    pub fn success_then_failures(response: &str) -> Self {
        Self::from_outcomes(vec![
            ScriptedOutcome::Choices(vec![response.to_string()]),
            ScriptedOutcome::Error,
        ])
    }

    fn from_outcomes(script: Vec<ScriptedOutcome>) -> Self {
        Self {
            script: std::sync::Mutex::new(script),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of chat calls issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl ChatClient for MockChatClient {
    fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: &GenerationOptions,
    ) -> Result<Vec<String>, LlmError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let mut script = self.script.lock().unwrap();
        let outcome = if script.len() > 1 {
            script.remove(0)
        } else {
            match script.first() {
                Some(ScriptedOutcome::Choices(c)) => ScriptedOutcome::Choices(c.clone()),
                Some(ScriptedOutcome::Error) | None => ScriptedOutcome::Error,
            }
        };

        match outcome {
            ScriptedOutcome::Choices(choices) => Ok(choices),
            ScriptedOutcome::Error => Err(LlmError::Connection("mock failure".to_string())),
        }
    }
}
