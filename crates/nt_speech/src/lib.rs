//! Speech synthesis adapters.
//!
//! Both providers implement [`nt_core::SpeechSynthesizer`]; pairing them as
//! primary and fallback is left to the pipeline's provider registry.

use std::time::Duration;

use nt_core::Result;

pub mod providers;

pub use providers::google::{GoogleTtsConfig, GoogleTtsProvider};
pub use providers::openai::{OpenAiTtsConfig, OpenAiTtsProvider};

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}
