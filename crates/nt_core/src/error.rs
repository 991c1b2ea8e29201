use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("{0} returned no results")]
    EmptyResult(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("All {capability} providers failed (primary: {primary}; fallback: {fallback})")]
    BatchFailure {
        capability: String,
        primary: String,
        fallback: String,
    },

    #[error("No article batch has been fetched yet")]
    NoBatch,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
