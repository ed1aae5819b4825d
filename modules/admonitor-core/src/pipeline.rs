//! Discovery pipeline: one scan-index query, deduplication and filtering
//! into candidates, then paced classification of each candidate.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use urlscan_client::SearchHit;

use crate::domains::{extract_domain, query_domain, PlatformFilter};
use crate::traits::{AdClassifier, ScanSearch};
use crate::types::{Candidate, Classification, SiteResult};

/// Maximum candidates returned per page. Scanning stops once this many hits
/// are accepted; the next page comes from a fresh cursor-driven query, not
/// from the remainder of this batch.
pub const PAGE_LIMIT: usize = 15;

/// Records requested from the scan index per page.
const FETCH_SIZE: usize = 50;

/// Pause between successive classifier calls. A deliberate serialization
/// point against upstream rate limits.
const CLASSIFY_PACING: Duration = Duration::from_millis(500);

/// Candidates accepted from one hit batch, plus the continuation cursor.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub candidates: Vec<Candidate>,
    /// Sort-key components of the last accepted hit, comma-joined. Absent
    /// when nothing was accepted.
    pub next_cursor: Option<String>,
}

/// Single deterministic pass over hits in the order received. A hit is
/// skipped when its domain is empty, already seen, a platform suffix, or
/// contains the query's own domain as a substring (case-insensitive).
///
/// The substring test knowingly over-excludes: a query for `ex.com` also
/// drops `index.com`. Long-standing behavior the dashboard depends on;
/// kept as is.
pub fn filter_hits(hits: &[SearchHit], query: &str, platforms: &PlatformFilter) -> FilterOutcome {
    let excluded = query_domain(query);
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();
    let mut last_sort_key = None;

    for hit in hits {
        let domain = extract_domain(&hit.page.url);
        if domain.is_empty() || seen.contains(&domain) || platforms.is_platform(&domain) {
            continue;
        }
        if !excluded.is_empty() && domain.to_lowercase().contains(&excluded) {
            continue;
        }

        seen.insert(domain.clone());
        if let Some(key) = hit.sort_key() {
            last_sort_key = Some(key);
        }
        candidates.push(Candidate::from_hit(domain, hit));

        if candidates.len() >= PAGE_LIMIT {
            break;
        }
    }

    let next_cursor = if candidates.is_empty() {
        None
    } else {
        last_sort_key
    };

    FilterOutcome {
        candidates,
        next_cursor,
    }
}

/// One page of pipeline output.
#[derive(Debug)]
pub struct PipelineOutput {
    pub query: String,
    /// Upstream total reported by the scan index.
    pub total: u64,
    pub results: Vec<SiteResult>,
    pub next_cursor: Option<String>,
    /// Error note from a failed upstream search; results are then empty.
    pub error: Option<String>,
}

impl PipelineOutput {
    pub fn confirmed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification.status.is_confirmed())
            .count()
    }

    pub fn possible_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification.status.is_possible())
            .count()
    }
}

pub struct Pipeline {
    search: Arc<dyn ScanSearch>,
    classifier: Arc<dyn AdClassifier>,
    platforms: PlatformFilter,
    pacing: Duration,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn ScanSearch>,
        classifier: Arc<dyn AdClassifier>,
        platforms: PlatformFilter,
    ) -> Self {
        Self {
            search,
            classifier,
            platforms,
            pacing: CLASSIFY_PACING,
        }
    }

    /// Override the inter-classification pause. Tests pass zero.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run one page of discovery: a single scan-index query, filtering, then
    /// serial classification of each surviving candidate.
    pub async fn run(&self, query: &str, search_after: Option<&str>) -> PipelineOutput {
        let outcome = self
            .search
            .search(query, Some(FETCH_SIZE), search_after)
            .await;
        let FilterOutcome {
            candidates,
            next_cursor,
        } = filter_hits(&outcome.hits, query, &self.platforms);

        tracing::info!(
            query,
            hits = outcome.hits.len(),
            total = outcome.total,
            candidates = candidates.len(),
            "discovery page filtered"
        );

        let count = candidates.len();
        let mut results = Vec::with_capacity(count);
        for (i, candidate) in candidates.into_iter().enumerate() {
            let classification = self.classifier.classify(&candidate.domain).await;
            results.push(SiteResult {
                candidate,
                classification,
            });
            if i + 1 < count && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        PipelineOutput {
            query: query.to_string(),
            total: outcome.total,
            results,
            next_cursor,
            error: outcome.error,
        }
    }

    /// Check a single known domain, bypassing discovery entirely. Input with
    /// a path separator is treated as a URL and run through the extractor;
    /// anything else is taken as a bare domain.
    pub async fn check(&self, raw: &str) -> (String, Classification) {
        let domain = if raw.contains('/') {
            extract_domain(raw)
        } else {
            raw.trim().to_string()
        };
        let classification = self.classifier.classify(&domain).await;
        (domain, classification)
    }
}
