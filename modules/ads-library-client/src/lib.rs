pub mod error;

pub use error::{AdsLibraryError, Result};

use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://graph.facebook.com/v19.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fields requested for each archived ad record.
const AD_FIELDS: &str = "id,ad_delivery_start_time,page_name,page_id";

/// How many active ads to fetch per search; one is enough to confirm, a few
/// give the caller a usable total.
const AD_LIMIT: u32 = 5;

/// One archived ad record from the Ad Library.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ad_delivery_start_time: Option<String>,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub page_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    data: Vec<AdRecord>,
}

pub struct AdsLibraryClient {
    client: reqwest::Client,
    access_token: Option<String>,
}

impl AdsLibraryClient {
    pub fn new(access_token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            access_token: access_token.filter(|t| !t.is_empty()).map(String::from),
        }
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Search the Ad Library for currently active ads matching `search_term`
    /// reaching the given country. Fails with `MissingToken` when no access
    /// token is configured; callers decide how to degrade.
    pub async fn search_active_ads(&self, search_term: &str, country: &str) -> Result<Vec<AdRecord>> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(AdsLibraryError::MissingToken)?;

        let url = format!("{BASE_URL}/ads_archive");
        let limit = AD_LIMIT.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("access_token", token),
            ("ad_reached_countries", country),
            ("search_terms", search_term),
            ("ad_active_status", "ACTIVE"),
            ("fields", AD_FIELDS),
            ("limit", &limit),
        ];

        let resp = self.client.get(&url).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AdsLibraryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ArchiveResponse = resp.json().await?;
        tracing::debug!(search_term, country, ads = body.data.len(), "ad library search");
        Ok(body.data)
    }
}

/// Public Ad Library link filtered to active ads for a term in a country.
pub fn library_link(search_term: &str, country: &str) -> String {
    format!(
        "https://www.facebook.com/ads/library/?active_status=active&ad_type=all&country={country}&q={search_term}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_link_embeds_term_and_country() {
        let link = library_link("acme.test", "BR");
        assert!(link.contains("q=acme.test"));
        assert!(link.contains("country=BR"));
        assert!(link.contains("active_status=active"));
    }

    #[test]
    fn client_without_token_reports_missing() {
        let client = AdsLibraryClient::new(None);
        assert!(!client.has_token());
        let client = AdsLibraryClient::new(Some(""));
        assert!(!client.has_token());
    }

    #[test]
    fn deserializes_archive_response() {
        let body = serde_json::json!({
            "data": [{
                "id": "123",
                "ad_delivery_start_time": "2025-07-01",
                "page_name": "Acme Store",
                "page_id": "456"
            }]
        });
        let parsed: ArchiveResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].page_name.as_deref(), Some("Acme Store"));
    }
}
