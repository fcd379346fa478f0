pub mod types;
pub mod groq;

pub use types::*;
pub use groq::GroqClient;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Completion service unreachable: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion service error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
