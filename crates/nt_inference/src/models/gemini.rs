use async_trait::async_trait;
use nt_core::models::SUMMARY_INSTRUCTION;
use nt_core::{Error, Result, Summarizer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Gemini `generateContent` summarizer. Instruction and description travel in
/// a single prompt.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl fmt::Debug for GeminiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSummarizer")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiSummarizer {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            config,
        })
    }

    fn prompt(text: &str) -> String {
        format!("{} {}", SUMMARY_INSTRUCTION, text)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("Gemini API key is not set".to_string()))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Self::prompt(text) }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(url)
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
            .json::<GenerateResponse>()
            .await
            .map_err(|e| Error::provider(self.name(), format!("Unexpected response: {}", e)))?;

        // Blocked prompts come back without candidates
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResult(self.name().to_string()))?;

        let summary = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<String>();
        debug!("Gemini summary: {}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summarizer(server: &MockServer) -> GeminiSummarizer {
        GeminiSummarizer::new(GeminiConfig {
            api_key: Some("gemini-key".to_string()),
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_summarize_joins_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "gemini-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    { "parts": [ { "text": "Summarize this article in 2 sentences: Rain is expected." } ] }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    {
                        "content": {
                            "role": "model",
                            "parts": [ { "text": "Rain is coming. " }, { "text": "Bring an umbrella." } ]
                        },
                        "finishReason": "STOP"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer(&server).summarize("Rain is expected.").await.unwrap();
        assert_eq!(summary, "Rain is coming. Bring an umbrella.");
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let result = summarizer(&server).summarize("text").await;
        assert!(matches!(result, Err(Error::EmptyResult(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let result = summarizer(&server).summarize("text").await;
        assert!(matches!(result, Err(Error::Provider { .. })));
    }
}
