pub mod types;
pub mod extraction;
pub mod identify;
pub mod remedy;
pub mod review;
pub mod orchestrator;

pub use types::*;
pub use extraction::{ExtractionError, OcrSpaceClient, TextExtractor};
pub use identify::{identify_condition, is_unidentified};
pub use orchestrator::Orchestrator;
pub use remedy::fetch_remedy;
pub use review::review_answer;
