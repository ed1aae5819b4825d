pub mod error;
pub mod types;

pub use error::{Result, UrlscanError};
pub use types::{PageInfo, SearchHit, SearchOutcome, SearchPage, TaskInfo};

use std::time::Duration;

const BASE_URL: &str = "https://urlscan.io/api/v1";

/// Default number of records requested per search call.
pub const DEFAULT_PAGE_SIZE: usize = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct UrlscanClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl UrlscanClient {
    /// Build a client with a bounded request timeout. The API key is
    /// optional; without one the auth header is simply omitted and the
    /// anonymous rate limits apply.
    pub fn new(api_key: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()).map(String::from),
        }
    }

    /// Run one search query, requesting up to `size` records (default 50),
    /// optionally resuming after a previous page's cursor.
    pub async fn search(
        &self,
        query: &str,
        size: Option<usize>,
        search_after: Option<&str>,
    ) -> Result<SearchPage> {
        let url = format!("{BASE_URL}/search/");
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).to_string();

        let mut params: Vec<(&str, &str)> = vec![("q", query), ("size", &size)];
        if let Some(cursor) = search_after {
            params.push(("search_after", cursor));
        }

        let mut req = self.client.get(&url).query(&params);
        if let Some(ref key) = self.api_key {
            req = req.header("API-Key", key);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UrlscanError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let page: SearchPage = resp.json().await?;
        tracing::debug!(query, total = page.total, returned = page.results.len(), "urlscan search");
        Ok(page)
    }

    /// Fail-soft variant of [`search`](Self::search): an upstream failure
    /// becomes an empty outcome carrying the error note, never an `Err`.
    /// The pipeline treats a failed sub-query identically to an empty one.
    pub async fn search_soft(
        &self,
        query: &str,
        size: Option<usize>,
        search_after: Option<&str>,
    ) -> SearchOutcome {
        match self.search(query, size, search_after).await {
            Ok(page) => SearchOutcome {
                hits: page.results,
                total: page.total,
                error: None,
            },
            Err(e) => {
                tracing::warn!(query, error = %e, "urlscan search failed, degrading to empty result");
                SearchOutcome {
                    hits: Vec::new(),
                    total: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
