use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use urlscan_client::SearchHit;

/// Tri-state advertising verdict for one domain.
///
/// On the wire this is the `anunciando` field: `true` (confirmed),
/// `null` (possible — a campaign signal exists but is unattributed) or
/// `false` (no signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdStatus {
    Confirmed,
    Possible,
    #[default]
    None,
}

impl AdStatus {
    pub fn is_confirmed(self) -> bool {
        self == AdStatus::Confirmed
    }

    pub fn is_possible(self) -> bool {
        self == AdStatus::Possible
    }

    /// Wire representation: `Some(true)` / `None` / `Some(false)`.
    pub fn as_wire(self) -> Option<bool> {
        match self {
            AdStatus::Confirmed => Some(true),
            AdStatus::Possible => None,
            AdStatus::None => Some(false),
        }
    }
}

impl Serialize for AdStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_wire() {
            Some(b) => serializer.serialize_bool(b),
            None => serializer.serialize_none(),
        }
    }
}

/// Which heuristic produced a non-negative verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    /// An ad-click tracking parameter was observed in a scanned URL.
    ClickId,
    /// A campaign parameter attributed to the target ad network.
    CampaignAttributed,
    /// Campaign parameters observed but none attributable.
    CampaignGeneric,
    /// An active record in the ads-transparency library.
    AdsLibrary,
}

/// Outcome of ad-signal classification for one domain. Field names follow
/// the dashboard's wire format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    #[serde(rename = "anunciando")]
    pub status: AdStatus,

    #[serde(rename = "indicador", skip_serializing_if = "Option::is_none")]
    pub indicator: Option<Indicator>,

    /// Example scanned URL supporting the verdict.
    #[serde(rename = "exemplo_url", skip_serializing_if = "Option::is_none")]
    pub example_url: Option<String>,

    #[serde(rename = "exemplo_data", skip_serializing_if = "Option::is_none")]
    pub example_time: Option<DateTime<Utc>>,

    /// Total matching scan records behind the verdict.
    #[serde(rename = "total_registros", skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,

    // Ad Library evidence (ads-library strategy only)
    #[serde(rename = "total_anuncios", skip_serializing_if = "Option::is_none")]
    pub total_ads: Option<usize>,

    #[serde(rename = "pagina_fb", skip_serializing_if = "Option::is_none")]
    pub fb_page: Option<String>,

    #[serde(rename = "inicio_veiculacao", skip_serializing_if = "Option::is_none")]
    pub delivery_start: Option<String>,

    #[serde(rename = "link_biblioteca", skip_serializing_if = "Option::is_none")]
    pub library_link: Option<String>,

    /// Upstream failure note; the verdict above still stands.
    #[serde(rename = "erro", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn none_with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Confirmed verdict backed by a scan-index hit.
    pub fn confirmed_from_hit(
        indicator: Indicator,
        hit: &SearchHit,
        total_records: u64,
        library_link: String,
    ) -> Self {
        Self {
            status: AdStatus::Confirmed,
            indicator: Some(indicator),
            example_url: Some(hit.page.url.clone()),
            example_time: hit.task.time,
            total_records: Some(total_records),
            library_link: Some(library_link),
            ..Self::default()
        }
    }

    /// Possible verdict: campaign traffic observed, source unattributed.
    pub fn possible_from_hit(indicator: Indicator, hit: &SearchHit, total_records: u64) -> Self {
        Self {
            status: AdStatus::Possible,
            indicator: Some(indicator),
            example_url: Some(hit.page.url.clone()),
            example_time: hit.task.time,
            total_records: Some(total_records),
            ..Self::default()
        }
    }
}

/// A deduplicated, filtered domain that survived the discovery pipeline and
/// awaits classification.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    #[serde(rename = "dominio")]
    pub domain: String,

    /// The scanned page URL the domain was extracted from.
    pub url: String,

    #[serde(rename = "pais")]
    pub country: String,

    #[serde(rename = "data_scan", skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,

    #[serde(rename = "urlscan_link")]
    pub result_link: String,
}

impl Candidate {
    pub fn from_hit(domain: String, hit: &SearchHit) -> Self {
        Self {
            domain,
            url: hit.page.url.clone(),
            country: hit.page.country.clone().unwrap_or_default(),
            scanned_at: hit.task.time,
            result_link: hit.result_link(),
        }
    }
}

/// Final output record: candidate fields merged with its classification.
#[derive(Debug, Clone, Serialize)]
pub struct SiteResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(flatten)]
    pub classification: Classification,
}
