pub mod images;

pub use images::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Image search service unreachable: {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Image search service error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No API key configured")]
    MissingCredentials,
}
