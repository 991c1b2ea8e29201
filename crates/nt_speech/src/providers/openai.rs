//! OpenAI speech provider (`/audio/speech`)

use async_trait::async_trait;
use bytes::Bytes;
use nt_core::{AudioClip, AudioFormat, Error, Result, SpeechSynthesizer};
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// OpenAI rejects inputs longer than this many characters
const MAX_INPUT_CHARS: usize = 4096;

#[derive(Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Clone)]
pub struct OpenAiTtsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiTtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout_secs: 30,
        }
    }
}

pub struct OpenAiTtsProvider {
    client: reqwest::Client,
    config: OpenAiTtsConfig,
}

impl fmt::Debug for OpenAiTtsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiTtsProvider")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("voice", &self.config.voice)
            .finish()
    }
}

impl OpenAiTtsProvider {
    pub fn new(config: OpenAiTtsConfig) -> Result<Self> {
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiTtsProvider {
    fn name(&self) -> &str {
        "OpenAI TTS"
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("OpenAI API key is not set".to_string()))?;

        if text.trim().is_empty() {
            return Err(Error::provider(self.name(), "Text cannot be empty"));
        }
        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(Error::provider(
                self.name(),
                format!("Text too long: {} characters exceeds {} limit", chars, MAX_INPUT_CHARS),
            ));
        }

        let request = TtsRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(self.name(), format!("HTTP {}: {}", status, body)));
        }

        let audio: Bytes = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::EmptyResult(self.name().to_string()));
        }

        debug!(audio_size = audio.len(), "Speech synthesis complete");
        Ok(AudioClip::new(audio.to_vec(), AudioFormat::Mp3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAiTtsProvider {
        OpenAiTtsProvider::new(OpenAiTtsConfig {
            api_key: Some("test-api-key".to_string()),
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_synthesize_success() {
        let server = MockServer::start().await;
        let audio_bytes = vec![7u8; 1024];

        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "tts-1",
                "voice": "alloy",
                "input": "Hello, world!"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio_bytes.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let clip = provider(&server).synthesize("Hello, world!").await.unwrap();
        assert_eq!(clip.format, AudioFormat::Mp3);
        assert_eq!(clip.data, audio_bytes);
    }

    #[tokio::test]
    async fn test_empty_text_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = provider(&server).synthesize("   ").await;
        assert!(matches!(result, Err(Error::Provider { .. })));
    }

    #[tokio::test]
    async fn test_text_too_long_fails() {
        let server = MockServer::start().await;
        let long_text = "a".repeat(MAX_INPUT_CHARS + 1);
        let result = provider(&server).synthesize(&long_text).await;
        assert!(matches!(result, Err(Error::Provider { .. })));
    }

    #[tokio::test]
    async fn test_rate_limited_is_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "code": "rate_limit_exceeded" }
            })))
            .mount(&server)
            .await;

        let result = provider(&server).synthesize("Test").await;
        assert!(matches!(result, Err(Error::Provider { .. })));
    }
}
