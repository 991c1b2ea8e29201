//! Google Cloud Text-to-Speech provider (`text:synthesize`)

use async_trait::async_trait;
use base64::Engine;
use nt_core::{AudioClip, AudioFormat, Error, Result, SpeechSynthesizer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// BCP-47 language of the voice, e.g. `en-US`
    pub language_code: String,
    pub ssml_gender: String,
    pub timeout_secs: u64,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://texttospeech.googleapis.com/v1".to_string(),
            language_code: "en-US".to_string(),
            ssml_gender: "NEUTRAL".to_string(),
            timeout_secs: 30,
        }
    }
}

pub struct GoogleTtsProvider {
    client: reqwest::Client,
    config: GoogleTtsConfig,
}

impl fmt::Debug for GoogleTtsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTtsProvider")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .field("language_code", &self.config.language_code)
            .finish()
    }
}

impl GoogleTtsProvider {
    pub fn new(config: GoogleTtsConfig) -> Result<Self> {
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsProvider {
    fn name(&self) -> &str {
        "Google Cloud TTS"
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("Google TTS API key is not set".to_string()))?;

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language_code,
                ssml_gender: &self.config.ssml_gender,
            },
            audio_config: AudioConfig { audio_encoding: "MP3" },
        };

        let response = self
            .client
            .post(format!("{}/text:synthesize", self.config.base_url.trim_end_matches('/')))
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(self.name(), format!("HTTP {}: {}", status, body)));
        }

        let response = response
            .json::<SynthesizeResponse>()
            .await
            .map_err(|e| Error::provider(self.name(), format!("Unexpected response: {}", e)))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(response.audio_content.as_bytes())
            .map_err(|e| Error::provider(self.name(), format!("Invalid audio content: {}", e)))?;
        if audio.is_empty() {
            return Err(Error::EmptyResult(self.name().to_string()));
        }

        debug!(audio_size = audio.len(), "Speech synthesis complete");
        Ok(AudioClip::new(audio, AudioFormat::Mp3))
    }
}
