use nt_core::{FallbackOutcome, ProviderFailure, ProviderUsed, StoredBatch};
use serde::Serialize;

use crate::SynthesisMode;

pub mod fetch;
pub mod summarize;
pub mod synthesize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Served by the primary provider
    Primary,
    /// Served by the fallback provider after the primary failed
    Fallback,
    /// Both providers failed; the item carries a sentinel
    Degraded,
    /// No provider was called for this item
    Skipped,
}

/// What happened to one article within a stage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub title: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ProviderFailure>,
}

impl ItemReport {
    pub fn skipped(title: &str) -> Self {
        Self {
            title: title.to_string(),
            status: ItemStatus::Skipped,
            provider: None,
            failures: Vec::new(),
        }
    }

    pub fn from_outcome<T>(title: &str, outcome: &FallbackOutcome<T>) -> Self {
        let status = match outcome.used {
            ProviderUsed::Primary => ItemStatus::Primary,
            ProviderUsed::Fallback => ItemStatus::Fallback,
            ProviderUsed::None => ItemStatus::Degraded,
        };
        Self {
            title: title.to_string(),
            status,
            provider: outcome.provider.clone(),
            failures: outcome.failures.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    pub provider: String,
    pub used: ProviderUsed,
    pub failures: Vec<ProviderFailure>,
    pub batch: StoredBatch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeReport {
    /// One entry per article, in batch order
    pub summaries: Vec<String>,
    pub items: Vec<ItemReport>,
}

impl SummarizeReport {
    pub fn degraded(&self) -> usize {
        self.items.iter().filter(|i| i.status == ItemStatus::Degraded).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRef {
    pub title: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReport {
    pub mode: SynthesisMode,
    /// Per-article mode: every article that received audio, in batch order
    pub audio: Vec<AudioRef>,
    /// Combined mode: the narration file, when one was produced
    pub combined_audio_url: Option<String>,
    pub items: Vec<ItemReport>,
}

impl SynthesisReport {
    pub fn produced_audio(&self) -> bool {
        !self.audio.is_empty() || self.combined_audio_url.is_some()
    }
}
