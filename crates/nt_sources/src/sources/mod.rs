pub mod guardian;
pub mod newsapi;

pub use guardian::GuardianSource;
pub use newsapi::NewsApiSource;

/// Common utilities for news sources
pub(crate) mod utils {
    use nt_core::{Error, Result};
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use url::Url;

    pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?)
    }

    /// Appends `path` to the base URL, keeping any prefix the base already has.
    pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("Invalid base URL {}: {}", base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Configuration(format!("Base URL cannot take a path: {}", base_url)))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    /// Sends the request and decodes a JSON body, turning non-2xx answers into
    /// provider errors that carry the response text.
    pub async fn get_json<T: DeserializeOwned>(
        provider: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(provider, format!("HTTP {}: {}", status, body)));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| Error::provider(provider, format!("Unexpected response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::utils;

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let url = utils::endpoint("https://newsapi.org/v2", "top-headlines").unwrap();
        assert_eq!(url.as_str(), "https://newsapi.org/v2/top-headlines");

        let url = utils::endpoint("http://127.0.0.1:8080/", "search").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/search");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        assert!(utils::endpoint("invalid-url", "search").is_err());
    }
}
