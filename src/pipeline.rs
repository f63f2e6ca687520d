//! Search pipeline: resolve an author, scrape their profile, persist.
//!
//! The two core operations run sequentially with no retry and no
//! concurrency. All failures are collapsed to an empty result here — the
//! caller cannot tell "author not found" from "upstream unavailable", only
//! the logs can. The store write happens after every search, so a failed
//! search leaves an empty array in the file.

use crate::error::{DblpError, Result};
use crate::profile::{self, Publication};
use crate::resolver::{self, DEFAULT_DBLP_URL};
use crate::store::PublicationStore;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// User agent string for outbound requests
const USER_AGENT: &str = "rustdblp/0.1";

/// HTTP transport timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolver + extractor + store, wired to one shared HTTP client.
pub struct SearchPipeline {
    client: reqwest::Client,
    base_url: String,
    store: PublicationStore,
}

impl SearchPipeline {
    /// Create a pipeline persisting into the given store.
    pub fn new(store: PublicationStore) -> Result<Self> {
        let client = build_http_client()?;
        Ok(Self {
            client,
            base_url: DEFAULT_DBLP_URL.to_string(),
            store,
        })
    }

    /// Override the DBLP base URL (mirror sites, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the store backing this pipeline.
    pub fn store(&self) -> &PublicationStore {
        &self.store
    }

    /// Resolve an author name to a profile URL, or `None` on any failure.
    pub async fn resolve(&self, name: &str) -> Option<String> {
        match resolver::resolve_author_at(&self.client, &self.base_url, name).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                info!(author = name, "No author match");
                None
            }
            Err(e) => {
                warn!(author = name, error = %e, "Author lookup failed");
                None
            }
        }
    }

    /// Run a full search for one author name.
    ///
    /// Returns the extracted publication list, empty on any failure along
    /// the way. The result set (including an empty one) is persisted to
    /// the store before returning; a store failure is logged but does not
    /// affect the returned value.
    pub async fn search(&self, name: &str) -> Vec<Publication> {
        let started = Instant::now();

        let publications = match self.resolve(name).await {
            Some(profile_url) => {
                match profile::extract_publications(&self.client, &profile_url).await {
                    Ok(publications) => publications,
                    Err(e) => {
                        warn!(author = name, url = %profile_url, error = %e, "Extraction failed");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        if let Err(e) = self.store.save(&publications) {
            warn!(path = %self.store.path().display(), error = %e, "Failed to persist publications");
        }

        info!(
            author = name,
            count = publications.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );

        publications
    }
}

/// Build the shared HTTP client.
fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))
}
