use async_trait::async_trait;
use nt_core::models::SUMMARY_INSTRUCTION;
use nt_core::{Error, Result, Summarizer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// Chat-completion summarizer. The instruction goes in the system message and
/// the article description in the user message.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiSummarizer {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("OpenAI API key is not set".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: SUMMARY_INSTRUCTION },
                ChatMessage { role: "user", content: text },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(self.name(), format!("HTTP {}: {}", status, body)));
        }

        let response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::provider(self.name(), format!("Unexpected response: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResult(self.name().to_string()))?;

        let summary = choice.message.content.unwrap_or_default();
        debug!("OpenAI summary: {}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summarizer(server: &MockServer) -> OpenAiSummarizer {
        OpenAiSummarizer::new(OpenAiConfig {
            api_key: Some("test-api-key".to_string()),
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_summarize_sends_instruction_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4-turbo",
                "messages": [
                    { "role": "system", "content": "Summarize this article in 2 sentences:" },
                    { "role": "user", "content": "Stocks fell sharply on Monday." }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": "Stocks fell. Investors worried." } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer(&server)
            .summarize("Stocks fell sharply on Monday.")
            .await
            .unwrap();
        assert_eq!(summary, "Stocks fell. Investors worried.");
    }

    #[tokio::test]
    async fn test_rate_limit_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "code": "rate_limit_exceeded" }
            })))
            .mount(&server)
            .await;

        let result = summarizer(&server).summarize("text").await;
        assert!(matches!(result, Err(Error::Provider { .. })));
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = summarizer(&server).summarize("text").await;
        assert!(matches!(result, Err(Error::EmptyResult(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected() {
        let summarizer = OpenAiSummarizer::new(OpenAiConfig::default()).unwrap();
        let result = summarizer.summarize("text").await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
