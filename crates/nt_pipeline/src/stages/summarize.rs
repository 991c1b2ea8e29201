use nt_core::types::{NO_DESCRIPTION_SUMMARY, NO_SUMMARY};
use nt_core::{Article, Result};

use crate::stages::{ItemReport, SummarizeReport};
use crate::{Logger, Pipeline};

impl Pipeline {
    /// Summarizes every article of the stored batch in order, persists the
    /// summaries with one write and returns them.
    pub async fn summarize(&self) -> Result<SummarizeReport> {
        let _guard = self.lock.lock().await;
        let logger = Self::stage_logger("summarize");

        let mut batch = self.load_batch().await?;
        let total = batch.len();
        logger.info(&format!("📝 Summarizing {} articles of batch {}", total, batch.batch_id));

        let mut items = Vec::with_capacity(total);
        for (index, article) in batch.articles.iter_mut().enumerate() {
            let item_logger = logger.clone().with_prefix(format!("[{}/{}]", index + 1, total));
            items.push(self.summarize_article(article, &item_logger).await);
        }

        self.storage.replace(&batch).await?;

        let summaries: Vec<String> = batch
            .articles
            .iter()
            .map(|a| a.summary.clone().unwrap_or_else(|| NO_SUMMARY.to_string()))
            .collect();
        let report = SummarizeReport { summaries, items };
        logger.info(&format!(
            "✅ Stored {} summaries ({} degraded)",
            report.summaries.len(),
            report.degraded()
        ));
        Ok(report)
    }

    /// Sets `article.summary`, degrading to a sentinel instead of failing.
    pub(crate) async fn summarize_article(&self, article: &mut Article, logger: &Logger) -> ItemReport {
        if !article.has_description() {
            logger.debug(&format!("⏭️ {:?} has no description, skipping models", article.title));
            article.summary = Some(NO_DESCRIPTION_SUMMARY.to_string());
            return ItemReport::skipped(&article.title);
        }

        let primary = &*self.registry.summarizers.primary;
        let fallback = &*self.registry.summarizers.fallback;
        let text = article.description.as_str();

        let outcome = self
            .executor
            .run(
                "summarize",
                (primary.name(), move || async move { primary.summarize(text).await }),
                (fallback.name(), move || async move { fallback.summarize(text).await }),
            )
            .await;

        let report = ItemReport::from_outcome(&article.title, &outcome);
        let summary = outcome.value_or(String::new()).trim().to_string();
        if summary.is_empty() {
            logger.warn(&format!("⚠️ No usable summary for {:?}", article.title));
            article.summary = Some(NO_SUMMARY.to_string());
        } else {
            logger.debug(&format!("🧾 Summarized {:?}", article.title));
            article.summary = Some(summary);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nt_core::types::{NO_DESCRIPTION_SUMMARY, NO_SUMMARY};
    use nt_core::{Article, Error};
    use nt_storage::MemoryStorage;

    use crate::stages::fakes::*;
    use crate::stages::ItemStatus;
    use crate::SynthesisMode;

    fn sources() -> (Arc<FakeSource>, Arc<FakeSource>) {
        (FakeSource::failing("NewsAPI"), FakeSource::failing("Guardian"))
    }

    fn speech() -> (Arc<FakeSpeech>, Arc<FakeSpeech>) {
        (FakeSpeech::working("OpenAI TTS"), FakeSpeech::working("Google"))
    }

    #[tokio::test]
    async fn test_summaries_are_persisted_and_returned() {
        let primary = FakeSummarizer::replying("OpenAI", "  A short summary.  ");
        let fallback = FakeSummarizer::replying("Gemini", "unused");
        let f = fixture(
            sources(),
            (primary.clone(), fallback.clone()),
            speech(),
            stored(vec![article("One", "first"), article("Two", "second")]),
            SynthesisMode::PerArticle,
        );

        let report = f.pipeline.summarize().await.unwrap();

        assert_eq!(report.summaries, vec!["A short summary.", "A short summary."]);
        assert_eq!(primary.calls(), 2);
        assert_eq!(fallback.calls(), 0);
        let batch = load(&f.storage).await;
        assert!(batch.articles.iter().all(|a| a.summary.as_deref() == Some("A short summary.")));
        assert_eq!(f.storage.replace_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_description_never_calls_models() {
        let primary = FakeSummarizer::replying("OpenAI", "should not be used");
        let fallback = FakeSummarizer::replying("Gemini", "should not be used");
        let f = fixture(
            sources(),
            (primary.clone(), fallback.clone()),
            speech(),
            stored(vec![
                article("Blank", ""),
                Article::new("Absent", None, "http://absent"),
            ]),
            SynthesisMode::PerArticle,
        );

        let report = f.pipeline.summarize().await.unwrap();

        assert_eq!(primary.calls(), 0);
        assert_eq!(fallback.calls(), 0);
        assert_eq!(report.summaries, vec![NO_DESCRIPTION_SUMMARY, NO_DESCRIPTION_SUMMARY]);
        assert!(report.items.iter().all(|i| i.status == ItemStatus::Skipped));
    }

    #[tokio::test]
    async fn test_primary_failure_recorded_and_fallback_used() {
        let f = fixture(
            sources(),
            (FakeSummarizer::failing("OpenAI"), FakeSummarizer::replying("Gemini", "From Gemini.")),
            speech(),
            stored(vec![article("Rates", "The central bank held rates.")]),
            SynthesisMode::PerArticle,
        );

        let (logs, _guard) = CapturedLogs::start();
        let report = f.pipeline.summarize().await.unwrap();

        let warning = logs
            .lines()
            .into_iter()
            .find(|line| line.contains("WARN"))
            .expect("primary failure is logged");
        assert!(warning.contains("primary provider OpenAI failed"));
        assert!(warning.contains("model overloaded"));

        assert_eq!(report.summaries, vec!["From Gemini."]);
        let item = &report.items[0];
        assert_eq!(item.status, ItemStatus::Fallback);
        assert_eq!(item.provider.as_deref(), Some("Gemini"));
        assert_eq!(item.failures.len(), 1);
        assert_eq!(item.failures[0].provider, "OpenAI");
    }

    #[tokio::test]
    async fn test_total_failure_degrades_item_not_stage() {
        let f = fixture(
            sources(),
            (FakeSummarizer::failing("OpenAI"), FakeSummarizer::failing("Gemini")),
            speech(),
            stored(vec![article("One", "text"), article("Two", "")]),
            SynthesisMode::PerArticle,
        );

        let report = f.pipeline.summarize().await.unwrap();

        assert_eq!(report.summaries, vec![NO_SUMMARY, NO_DESCRIPTION_SUMMARY]);
        assert_eq!(report.degraded(), 1);
        let batch = load(&f.storage).await;
        assert_eq!(batch.articles[0].summary.as_deref(), Some(NO_SUMMARY));
    }

    #[tokio::test]
    async fn test_blank_model_output_becomes_sentinel() {
        let f = fixture(
            sources(),
            (FakeSummarizer::replying("OpenAI", "   "), FakeSummarizer::failing("Gemini")),
            speech(),
            stored(vec![article("One", "text")]),
            SynthesisMode::PerArticle,
        );

        let report = f.pipeline.summarize().await.unwrap();

        assert_eq!(report.summaries, vec![NO_SUMMARY]);
    }

    #[tokio::test]
    async fn test_empty_store_is_an_error() {
        let f = fixture(
            sources(),
            (FakeSummarizer::replying("OpenAI", "x"), FakeSummarizer::replying("Gemini", "y")),
            speech(),
            MemoryStorage::new(),
            SynthesisMode::PerArticle,
        );

        assert!(matches!(f.pipeline.summarize().await, Err(Error::NoBatch)));
        assert_eq!(f.storage.replace_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_batch_yields_no_summaries() {
        let f = fixture(
            (FakeSource::failing("NewsAPI"), FakeSource::returning("Guardian", vec![])),
            (FakeSummarizer::replying("OpenAI", "x"), FakeSummarizer::replying("Gemini", "y")),
            speech(),
            MemoryStorage::new(),
            SynthesisMode::PerArticle,
        );
        f.pipeline.fetch(nt_core::NewsQuery::new("nothing", None)).await.unwrap();

        let report = f.pipeline.summarize().await.unwrap();

        assert!(report.summaries.is_empty());
        assert!(report.items.is_empty());
        assert!(load(&f.storage).await.is_empty());
    }
}
