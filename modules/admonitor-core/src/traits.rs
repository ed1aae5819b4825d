// Trait abstractions for the pipeline's external dependencies.
//
// ScanSearch — one fail-soft query against the passive-scan index.
// AdClassifier — advertising verdict for one domain, strategy chosen at
//   startup from config.
//
// These enable deterministic testing with mock implementations: no network,
// no credentials.

use async_trait::async_trait;

use urlscan_client::{SearchOutcome, UrlscanClient};

use crate::types::Classification;

#[async_trait]
pub trait ScanSearch: Send + Sync {
    /// Run one search query against the scan index. Fail-soft: an upstream
    /// failure yields an empty outcome with an error note, never an error.
    async fn search(
        &self,
        query: &str,
        size: Option<usize>,
        search_after: Option<&str>,
    ) -> SearchOutcome;
}

#[async_trait]
impl ScanSearch for UrlscanClient {
    async fn search(
        &self,
        query: &str,
        size: Option<usize>,
        search_after: Option<&str>,
    ) -> SearchOutcome {
        self.search_soft(query, size, search_after).await
    }
}

#[async_trait]
pub trait AdClassifier: Send + Sync {
    /// Classify one domain's advertising status. Total: upstream failures
    /// degrade to a negative verdict carrying an error note.
    async fn classify(&self, domain: &str) -> Classification;
}
