use async_trait::async_trait;
use nt_core::{Article, Error, NewsQuery, NewsSource, Result};
use std::fmt;
use tracing::debug;

use super::utils;

/// Guardian content API response structures. Results nest the useful fields
/// under `response.results[].fields`.
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct SearchEnvelope {
        pub response: SearchResponse,
    }

    #[derive(Debug, Deserialize)]
    pub struct SearchResponse {
        #[serde(default)]
        pub results: Vec<SearchResult>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SearchResult {
        pub web_title: Option<String>,
        pub web_url: Option<String>,
        pub fields: Option<Fields>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Fields {
        pub headline: Option<String>,
        pub trail_text: Option<String>,
        pub short_url: Option<String>,
    }
}

#[derive(Debug, Clone)]
pub struct GuardianConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://content.guardianapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Full-text keyword search against The Guardian content API.
pub struct GuardianSource {
    client: reqwest::Client,
    config: GuardianConfig,
}

impl fmt::Debug for GuardianSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardianSource")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl GuardianSource {
    pub fn new(config: GuardianConfig) -> Result<Self> {
        Ok(Self {
            client: utils::http_client(config.timeout_secs)?,
            config,
        })
    }

    fn map_result(result: api::SearchResult) -> Option<Article> {
        let (headline, trail_text, short_url) = match result.fields {
            Some(fields) => (fields.headline, fields.trail_text, fields.short_url),
            None => (None, None, None),
        };
        let title = headline
            .or(result.web_title)
            .filter(|t| !t.trim().is_empty())?;
        let url = short_url
            .or(result.web_url)
            .filter(|u| !u.trim().is_empty())?;
        Some(Article::new(title, trail_text, url))
    }
}

#[async_trait]
impl NewsSource for GuardianSource {
    fn name(&self) -> &str {
        "The Guardian"
    }

    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("Guardian API key is not set".to_string()))?;

        let url = utils::endpoint(&self.config.base_url, "search")?;
        let params = [
            ("q", query.keyword.trim()),
            ("api-key", api_key),
            ("show-fields", "headline,trailText,shortUrl"),
        ];

        debug!("Requesting Guardian search for {:?}", query.keyword);
        let envelope: api::SearchEnvelope =
            utils::get_json(self.name(), self.client.get(url).query(&params)).await?;

        let articles: Vec<Article> = envelope
            .response
            .results
            .into_iter()
            .filter_map(Self::map_result)
            .collect();
        debug!("Guardian returned {} articles", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::types::DESCRIPTION_UNAVAILABLE;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> GuardianSource {
        GuardianSource::new(GuardianConfig {
            api_key: Some("guardian-key".to_string()),
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_nested_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "economy"))
            .and(query_param("api-key", "guardian-key"))
            .and(query_param("show-fields", "headline,trailText,shortUrl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "status": "ok",
                    "total": 3,
                    "results": [
                        {
                            "webTitle": "Web title one",
                            "webUrl": "https://www.theguardian.com/one",
                            "fields": {
                                "headline": "Headline one",
                                "trailText": "Trail one",
                                "shortUrl": "https://gu.com/p/1"
                            }
                        },
                        {
                            "webTitle": "Web title two",
                            "webUrl": "https://www.theguardian.com/two",
                            "fields": { "headline": "Headline two", "shortUrl": "https://gu.com/p/2" }
                        },
                        {
                            "webTitle": "Web title three",
                            "webUrl": "https://www.theguardian.com/three"
                        }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let articles = source(&server)
            .search(&NewsQuery::new("economy", Some("business".to_string())))
            .await
            .unwrap();

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Headline one");
        assert_eq!(articles[0].description, "Trail one");
        assert_eq!(articles[0].url, "https://gu.com/p/1");
        assert_eq!(articles[1].description, DESCRIPTION_UNAVAILABLE);
        assert_eq!(articles[2].title, "Web title three");
        assert_eq!(articles[2].url, "https://www.theguardian.com/three");
    }

    #[tokio::test]
    async fn test_server_error_is_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let result = source(&server).search(&NewsQuery::new("x", None)).await;
        match result {
            Err(Error::Provider { provider, message }) => {
                assert_eq!(provider, "The Guardian");
                assert!(message.contains("503"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
