//! Fetch → summarize → synthesize pipeline over a shared batch store.
//!
//! Every stage reads the stored batch once, works through its articles in
//! order, and replaces the stored batch once at the end. Stage invocations
//! against one [`Pipeline`] are serialized by an internal lock.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use nt_core::{BatchStorage, Error, FallbackExecutor, Result, StoredBatch};
use nt_storage::AudioStore;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub mod logging;
pub mod registry;
pub mod stages;

pub use logging::{init_logging, Logger};
pub use registry::{ProviderPair, ProviderRegistry, ProviderSettings};
pub use stages::{
    AudioRef, FetchReport, ItemReport, ItemStatus, SummarizeReport, SynthesisReport,
};

/// Shape of the synthesize stage's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisMode {
    /// One audio file per article with a real summary
    #[default]
    PerArticle,
    /// One audio file narrating every real summary in order
    Combined,
}

impl FromStr for SynthesisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-article" | "per_article" | "article" => Ok(Self::PerArticle),
            "combined" => Ok(Self::Combined),
            other => Err(Error::Configuration(format!(
                "Unknown synthesis mode: {} (expected per-article or combined)",
                other
            ))),
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerArticle => write!(f, "per-article"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound for each provider call, enforced by the fallback executor
    pub provider_timeout: Option<Duration>,
    pub synthesis_mode: SynthesisMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Some(Duration::from_secs(30)),
            synthesis_mode: SynthesisMode::default(),
        }
    }
}

pub struct Pipeline {
    registry: ProviderRegistry,
    storage: Arc<dyn BatchStorage>,
    audio: AudioStore,
    executor: FallbackExecutor,
    synthesis_mode: SynthesisMode,
    lock: Mutex<()>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("registry", &self.registry)
            .field("audio", &self.audio)
            .field("executor", &self.executor)
            .field("synthesis_mode", &self.synthesis_mode)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        registry: ProviderRegistry,
        storage: Arc<dyn BatchStorage>,
        audio: AudioStore,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            storage,
            audio,
            executor: FallbackExecutor::new(config.provider_timeout),
            synthesis_mode: config.synthesis_mode,
            lock: Mutex::new(()),
        }
    }

    pub fn synthesis_mode(&self) -> SynthesisMode {
        self.synthesis_mode
    }

    /// The last batch a stage stored. Does not wait for a running stage;
    /// stores replace their content atomically.
    pub async fn current_batch(&self) -> Result<Option<StoredBatch>> {
        self.storage.load().await
    }

    /// The batch a stage works on. Only a store that was never filled is an
    /// error; a fetched batch with no articles is worked on as is.
    async fn load_batch(&self) -> Result<StoredBatch> {
        self.storage.load().await?.ok_or(Error::NoBatch)
    }

    fn stage_logger(stage: &str) -> Logger {
        Logger::new().with_new_prefixes(format!("[{}]", stage))
    }
}
