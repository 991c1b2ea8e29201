use async_trait::async_trait;
use crate::types::AudioClip;
use crate::Result;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Provider name used in logs and failure records
    fn name(&self) -> &str;

    /// Turn text into encoded audio
    async fn synthesize(&self, text: &str) -> Result<AudioClip>;
}
