use nt_core::{Error, NewsQuery, Result, StoredBatch};

use crate::stages::FetchReport;
use crate::Pipeline;

impl Pipeline {
    /// Pulls a fresh batch of headlines and replaces the stored batch with it.
    ///
    /// An empty result from the primary source counts as a failure and moves
    /// on to the fallback; whatever the fallback returns, even nothing, becomes
    /// the new batch. When both sources fail the store is left untouched.
    pub async fn fetch(&self, query: NewsQuery) -> Result<FetchReport> {
        let _guard = self.lock.lock().await;
        let logger = Self::stage_logger("fetch");
        logger.info(&format!(
            "🔎 Fetching news for keyword {:?} (category: {})",
            query.keyword,
            query.category.as_deref().unwrap_or("any")
        ));

        let primary = &*self.registry.news.primary;
        let fallback = &*self.registry.news.fallback;
        let query_ref = &query;

        let outcome = self
            .executor
            .run(
                "fetch",
                (primary.name(), move || async move {
                    let articles = primary.search(query_ref).await?;
                    if articles.is_empty() {
                        return Err(Error::EmptyResult(primary.name().to_string()));
                    }
                    Ok(articles)
                }),
                (fallback.name(), move || async move { fallback.search(query_ref).await }),
            )
            .await;

        let provider = outcome.provider.clone().unwrap_or_default();
        let used = outcome.used;
        let failures = outcome.failures.clone();
        let articles = outcome.into_result("fetch").map_err(|e| {
            logger.error(&format!("❌ No news source succeeded: {}", e));
            e
        })?;

        let batch = StoredBatch::new(&query, articles);
        self.storage.replace(&batch).await?;
        logger.info(&format!(
            "📰 Stored {} articles from {} as batch {}",
            batch.len(),
            provider,
            batch.batch_id
        ));

        Ok(FetchReport {
            provider,
            used,
            failures,
            batch,
        })
    }
}
