use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number, got {0:?}")]
    InvalidPort(String),

    #[error("Unknown CLASSIFIER {0:?} (expected \"heuristic\" or \"ads-library\")")]
    UnknownClassifier(String),
}

/// Which ad-signal classification strategy to run. A deployment-time choice:
/// the heuristic variant mines the scan index, the Ad Library variant needs
/// an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Heuristic,
    AdsLibrary,
}

/// Application configuration loaded from environment variables.
/// Constructed once at startup and passed into the clients and the pipeline;
/// leaf functions never read the environment themselves.
#[derive(Debug, Clone)]
pub struct Config {
    /// urlscan.io API key. Optional: without it the auth header is omitted.
    pub urlscan_api_key: Option<String>,

    /// Meta Ad Library access token. Without it the ads-library strategy
    /// fails closed.
    pub fb_access_token: Option<String>,

    pub classifier: ClassifierKind,

    /// Country scope for ad lookups and Ad Library links.
    pub country: String,

    /// Extra hosting-platform suffixes appended to the built-in filter list.
    pub extra_platform_suffixes: Vec<String>,

    // Web server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional; missing credentials degrade behavior rather than failing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let classifier = match env::var("CLASSIFIER").ok().as_deref() {
            None | Some("") | Some("heuristic") => ClassifierKind::Heuristic,
            Some("ads-library") => ClassifierKind::AdsLibrary,
            Some(other) => return Err(ConfigError::UnknownClassifier(other.to_string())),
        };

        let port_raw = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let port = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        Ok(Self {
            urlscan_api_key: optional_env("URLSCAN_API_KEY"),
            fb_access_token: optional_env("FB_ACCESS_TOKEN"),
            classifier,
            country: env::var("AD_COUNTRY").unwrap_or_else(|_| "BR".to_string()),
            extra_platform_suffixes: optional_env("PLATFORM_SUFFIXES")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
