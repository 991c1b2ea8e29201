use async_trait::async_trait;
use crate::types::{Article, NewsQuery};
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Provider name used in logs and failure records
    fn name(&self) -> &str;

    /// Search for articles matching the query, already mapped to fresh articles
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>>;
}
