use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remedy tradition requested for an identified condition.
///
/// The declaration order is the canonical category order; it drives both
/// the fan-out and the section order of the aggregated answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RemedyCategory {
    Home,
    Ayurvedic,
    Homeopathic,
    Allopathic,
}

impl RemedyCategory {
    /// All categories, in canonical order.
    pub const ALL: [RemedyCategory; 4] = [
        Self::Home,
        Self::Ayurvedic,
        Self::Homeopathic,
        Self::Allopathic,
    ];

    /// Spelling used inside prompts and placeholder strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Ayurvedic => "Ayurvedic",
            Self::Homeopathic => "homeopathic",
            Self::Allopathic => "allopathic",
        }
    }

    /// Section label used when aggregating remedy text for review.
    pub fn label(&self) -> String {
        format!("{}_remedy", self.as_str())
    }
}

impl fmt::Display for RemedyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remedy description plus illustrative images for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemedyEntry {
    pub description: String,
    /// Deduplicated image URLs, at most the configured count. May be empty.
    pub images: Vec<String>,
}

/// Terminal aggregate of a successful consultation request.
///
/// Every category has exactly one entry; fetch failures appear as
/// placeholder descriptions, never as missing keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub condition: String,
    pub remedies: BTreeMap<RemedyCategory, RemedyEntry>,
    pub review: String,
}

/// Terminal failure of a consultation request.
///
/// The `Display` strings are the complete user-visible surface; internal
/// detail goes to tracing, never to the caller.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("No valid input provided.")]
    NoInput,

    #[error("Failed to extract text from document.")]
    ExtractionFailed,

    #[error("Could not identify any medical condition.")]
    NoCondition,

    #[error("An error occurred: {0}")]
    Internal(String),
}
