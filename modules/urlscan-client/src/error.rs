use thiserror::Error;

pub type Result<T> = std::result::Result<T, UrlscanError>;

#[derive(Debug, Error)]
pub enum UrlscanError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for UrlscanError {
    fn from(err: reqwest::Error) -> Self {
        UrlscanError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for UrlscanError {
    fn from(err: serde_json::Error) -> Self {
        UrlscanError::Parse(err.to_string())
    }
}
