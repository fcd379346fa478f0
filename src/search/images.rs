//! Image search adapter — retrieves illustrative image URLs for a query.
//!
//! The adapter is fail-soft end to end: `search_remedy_images` absorbs
//! every error into an empty list so the remedy fan-in barrier always
//! completes with a value per category. Candidates are over-fetched at
//! twice the requested count because image indexes routinely return the
//! same URL under several results.

use std::collections::HashSet;

use serde::Deserialize;

use super::SearchError;

/// Trait for the external image-search service.
///
/// Implementations return raw candidate hits; deduplication and capping
/// happen in `search_remedy_images`, not in the client.
pub trait ImageSearchClient: Send + Sync {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<ImageHit>, SearchError>;
}

/// One image result descriptor. The URL is the only field the pipeline
/// consumes; everything else the service returns is dropped at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageHit {
    pub url: String,
}

/// Fetch up to `count` distinct image URLs for a query.
///
/// Over-fetches `count * 2` candidates, deduplicates by URL with set
/// semantics, and truncates to `count`. Returning fewer than `count` is
/// valid when fewer unique URLs exist. Any service error degrades to an
/// empty list.
pub fn search_remedy_images(
    client: &dyn ImageSearchClient,
    query: &str,
    count: usize,
) -> Vec<String> {
    let hits = match client.search(query, count * 2) {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Image search failed, returning no images");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for hit in hits {
        if seen.insert(hit.url.clone()) {
            unique.push(hit.url);
            if unique.len() == count {
                break;
            }
        }
    }
    unique
}

// ──────────────────────────────────────────────
// SerpApiImageSearch
// ──────────────────────────────────────────────

/// Production image search backed by a SerpAPI-shaped endpoint.
///
/// The key is optional at construction: a client without credentials fails
/// every search, which `search_remedy_images` absorbs into the empty list.
pub struct SerpApiImageSearch {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl SerpApiImageSearch {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
            client,
        }
    }
}

/// Response body from GET /search.json?engine=google_images
#[derive(Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    images_results: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct ImageResult {
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl ImageSearchClient for SerpApiImageSearch {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<ImageHit>, SearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SearchError::MissingCredentials)?;

        let url = format!("{}/search.json", self.base_url);
        let num = max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google_images"),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SearchError::Connection(self.base_url.clone())
                } else {
                    SearchError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ImageSearchResponse = response
            .json()
            .map_err(|e| SearchError::ResponseParsing(e.to_string()))?;

        Ok(parsed
            .images_results
            .into_iter()
            .filter_map(|r| r.original.or(r.thumbnail))
            .map(|url| ImageHit { url })
            .collect())
    }
}

// ──────────────────────────────────────────────
// MockImageSearch (testing)
// ──────────────────────────────────────────────

/// Mock image search returning a configured candidate list, or an error.
pub struct MockImageSearch {
    hits: Vec<String>,
    fail: bool,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockImageSearch {
    pub fn with_urls(urls: &[&str]) -> Self {
        Self {
            hits: urls.iter().map(|u| (*u).to_string()).collect(),
            fail: false,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of searches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl ImageSearchClient for MockImageSearch {
    fn search(&self, _query: &str, max_results: usize) -> Result<Vec<ImageHit>, SearchError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Connection("mock failure".to_string()));
        }
        Ok(self
            .hits
            .iter()
            .take(max_results)
            .map(|u| ImageHit { url: u.clone() })
            .collect())
    }
}
