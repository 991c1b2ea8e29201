//! Process-wide provider registry: one primary and one fallback adapter per
//! capability, built once at startup and shared by every stage.

use std::fmt;
use std::sync::Arc;

use nt_core::{NewsSource, Result, SpeechSynthesizer, Summarizer};
use nt_inference::{GeminiConfig, GeminiSummarizer, OpenAiConfig, OpenAiSummarizer};
use nt_sources::{GuardianConfig, GuardianSource, NewsApiConfig, NewsApiSource};
use nt_speech::{GoogleTtsConfig, GoogleTtsProvider, OpenAiTtsConfig, OpenAiTtsProvider};
use tracing::info;

pub struct ProviderPair<T: ?Sized> {
    pub primary: Arc<T>,
    pub fallback: Arc<T>,
}

impl<T: ?Sized> ProviderPair<T> {
    pub fn new(primary: Arc<T>, fallback: Arc<T>) -> Self {
        Self { primary, fallback }
    }
}

impl<T: ?Sized> Clone for ProviderPair<T> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

/// Connection settings for every provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub newsapi: NewsApiConfig,
    pub guardian: GuardianConfig,
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub openai_tts: OpenAiTtsConfig,
    pub google_tts: GoogleTtsConfig,
}

impl ProviderSettings {
    /// Applies one request timeout to every provider client.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.newsapi.timeout_secs = secs;
        self.guardian.timeout_secs = secs;
        self.openai.timeout_secs = secs;
        self.gemini.timeout_secs = secs;
        self.openai_tts.timeout_secs = secs;
        self.google_tts.timeout_secs = secs;
        self
    }
}

#[derive(Clone)]
pub struct ProviderRegistry {
    pub news: ProviderPair<dyn NewsSource>,
    pub summarizers: ProviderPair<dyn Summarizer>,
    pub speech: ProviderPair<dyn SpeechSynthesizer>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair = |primary: &str, fallback: &str| format!("{} -> {}", primary, fallback);
        f.debug_struct("ProviderRegistry")
            .field("news", &pair(self.news.primary.name(), self.news.fallback.name()))
            .field(
                "summarizers",
                &pair(self.summarizers.primary.name(), self.summarizers.fallback.name()),
            )
            .field("speech", &pair(self.speech.primary.name(), self.speech.fallback.name()))
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new(
        news: ProviderPair<dyn NewsSource>,
        summarizers: ProviderPair<dyn Summarizer>,
        speech: ProviderPair<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            news,
            summarizers,
            speech,
        }
    }

    /// Builds the production pairing: NewsAPI → Guardian, OpenAI → Gemini,
    /// OpenAI TTS → Google Cloud TTS.
    pub fn from_settings(settings: ProviderSettings) -> Result<Self> {
        let news = ProviderPair::<dyn NewsSource>::new(
            Arc::new(NewsApiSource::new(settings.newsapi)?),
            Arc::new(GuardianSource::new(settings.guardian)?),
        );
        let summarizers = ProviderPair::<dyn Summarizer>::new(
            Arc::new(OpenAiSummarizer::new(settings.openai)?),
            Arc::new(GeminiSummarizer::new(settings.gemini)?),
        );
        let speech = ProviderPair::<dyn SpeechSynthesizer>::new(
            Arc::new(OpenAiTtsProvider::new(settings.openai_tts)?),
            Arc::new(GoogleTtsProvider::new(settings.google_tts)?),
        );

        let registry = Self::new(news, summarizers, speech);
        info!("🧠 Providers initialized: {:?}", registry);
        Ok(registry)
    }
}
