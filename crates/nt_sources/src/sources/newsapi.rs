use async_trait::async_trait;
use nt_core::{Article, Error, NewsQuery, NewsSource, Result};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

use super::utils;

/// NewsAPI response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct TopHeadlines {
        #[serde(default)]
        pub articles: Vec<RawArticle>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawArticle {
        pub title: Option<String>,
        pub description: Option<String>,
        pub url: Option<String>,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Country code headlines are restricted to
    pub country: String,
    pub timeout_secs: u64,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".to_string(),
            country: "us".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Headline search against NewsAPI's `top-headlines` endpoint.
pub struct NewsApiSource {
    client: reqwest::Client,
    config: NewsApiConfig,
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.config.base_url)
            .field("country", &self.config.country)
            .finish()
    }
}

impl NewsApiSource {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        Ok(Self {
            client: utils::http_client(config.timeout_secs)?,
            config,
        })
    }

    fn map_articles(raw: Vec<api::RawArticle>) -> Vec<Article> {
        raw.into_iter()
            .filter_map(|a| match (a.title, a.url) {
                (Some(title), Some(url)) if !title.trim().is_empty() && !url.trim().is_empty() => {
                    Some(Article::new(title, a.description, url))
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("NewsAPI key is not set".to_string()))?;

        let mut params = vec![("country", self.config.country.as_str())];
        if !query.keyword.trim().is_empty() {
            params.push(("q", query.keyword.trim()));
        }
        if let Some(category) = query.category.as_deref() {
            params.push(("category", category));
        }
        params.push(("apiKey", api_key));

        let url = utils::endpoint(&self.config.base_url, "top-headlines")?;
        debug!("Requesting NewsAPI headlines for {:?}", query);
        let response: api::TopHeadlines =
            utils::get_json(self.name(), self.client.get(url).query(&params)).await?;

        let articles = Self::map_articles(response.articles);
        debug!("NewsAPI returned {} articles", articles.len());
        Ok(articles)
    }
}
