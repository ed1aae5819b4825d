use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdsLibraryError>;

#[derive(Debug, Error)]
pub enum AdsLibraryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Access token not configured")]
    MissingToken,
}

impl From<reqwest::Error> for AdsLibraryError {
    fn from(err: reqwest::Error) -> Self {
        AdsLibraryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AdsLibraryError {
    fn from(err: serde_json::Error) -> Self {
        AdsLibraryError::Parse(err.to_string())
    }
}
