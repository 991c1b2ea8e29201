use std::time::Duration;

use nt_core::Result;

pub mod models;

pub use models::gemini::{GeminiConfig, GeminiSummarizer};
pub use models::openai::{OpenAiConfig, OpenAiSummarizer};

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

pub mod prelude {
    pub use super::models::{GeminiSummarizer, OpenAiSummarizer};
    pub use nt_core::{Error, Result, Summarizer};
}
