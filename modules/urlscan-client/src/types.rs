use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Page-level fields of one search hit, as observed at scan time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Scan task metadata for one hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInfo {
    /// Scan timestamp.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// One record from the urlscan search index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub page: PageInfo,
    #[serde(default)]
    pub task: TaskInfo,
    /// Scan identifier, used to build the public result link.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Opaque sort key components; the pagination cursor is built from the
    /// last returned hit's components.
    #[serde(default)]
    pub sort: Vec<serde_json::Value>,
}

impl SearchHit {
    /// Join the sort-key components into a cursor string the API accepts
    /// back as `search_after`. None when the index returned no sort key.
    pub fn sort_key(&self) -> Option<String> {
        if self.sort.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .sort
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        Some(parts.join(","))
    }

    /// Public result-detail link for this scan.
    pub fn result_link(&self) -> String {
        format!("https://urlscan.io/result/{}/", self.id)
    }
}

/// One page of search results as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

/// Fail-soft search outcome: an upstream failure degrades to an empty page
/// with an error note, so callers treat it exactly like a legitimately
/// empty result set.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub total: u64,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_joins_mixed_components() {
        let hit = SearchHit {
            sort: vec![
                serde_json::json!(1694024400000u64),
                serde_json::json!("9a7b1c2d-e3f4"),
            ],
            ..Default::default()
        };
        assert_eq!(hit.sort_key().as_deref(), Some("1694024400000,9a7b1c2d-e3f4"));
    }

    #[test]
    fn sort_key_absent_when_empty() {
        let hit = SearchHit::default();
        assert!(hit.sort_key().is_none());
    }

    #[test]
    fn deserializes_search_page() {
        let body = serde_json::json!({
            "results": [{
                "page": {"url": "https://shop.example.test/", "country": "BR"},
                "task": {"time": "2025-08-01T12:00:00.000Z"},
                "_id": "abc-123",
                "sort": [1754049600000u64, "abc-123"]
            }],
            "total": 1,
            "has_more": false
        });
        let page: SearchPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].page.url, "https://shop.example.test/");
        assert_eq!(
            page.results[0].result_link(),
            "https://urlscan.io/result/abc-123/"
        );
    }
}
