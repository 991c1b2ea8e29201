use nt_core::{AudioClip, CombinedNarration, FallbackOutcome, Result, StoredBatch};
use nt_storage::AudioStore;

use crate::stages::{AudioRef, ItemReport, SynthesisReport};
use crate::{Logger, Pipeline, SynthesisMode};

impl Pipeline {
    /// Turns the stored summaries into audio.
    ///
    /// `mode` overrides the configured [`SynthesisMode`] for this call. Articles
    /// without a real summary are never spoken. When both speech providers fail
    /// the affected item (or the narration) simply gets no audio.
    pub async fn synthesize(&self, mode: Option<SynthesisMode>) -> Result<SynthesisReport> {
        let _guard = self.lock.lock().await;
        let mode = mode.unwrap_or(self.synthesis_mode);
        let logger = Self::stage_logger("synthesize").with_prefix(format!("[{}]", mode));

        let mut batch = self.load_batch().await?;
        let report = match mode {
            SynthesisMode::PerArticle => self.synthesize_articles(&mut batch, &logger).await?,
            SynthesisMode::Combined => self.synthesize_combined(&mut batch, &logger).await?,
        };
        self.storage.replace(&batch).await?;

        if report.produced_audio() {
            logger.info("🔊 Audio ready");
        } else {
            logger.warn("🔇 No audio was produced for this batch");
        }
        Ok(report)
    }

    async fn synthesize_articles(&self, batch: &mut StoredBatch, logger: &Logger) -> Result<SynthesisReport> {
        let total = batch.len();
        let mut audio = Vec::new();
        let mut items = Vec::with_capacity(total);

        for (index, article) in batch.articles.iter_mut().enumerate() {
            let item_logger = logger.clone().with_prefix(format!("[{}/{}]", index + 1, total));
            article.audio_url = None;

            let text = match article.summary.as_deref() {
                Some(summary) if article.has_real_summary() => summary.trim().to_string(),
                _ => {
                    item_logger.debug(&format!("⏭️ {:?} has no summary to speak", article.title));
                    items.push(ItemReport::skipped(&article.title));
                    continue;
                }
            };

            let outcome = self.speak(&text).await;
            items.push(ItemReport::from_outcome(&article.title, &outcome));
            match outcome.value {
                Some(clip) => {
                    let file_name = AudioStore::article_file_name(article, clip.format);
                    let url = self.audio.save(&file_name, &clip).await?;
                    item_logger.debug(&format!("🎧 {:?} -> {}", article.title, url));
                    audio.push(AudioRef {
                        title: article.title.clone(),
                        audio_url: url.clone(),
                    });
                    article.audio_url = Some(url);
                }
                None => {
                    item_logger.warn(&format!("⚠️ No audio for {:?}", article.title));
                }
            }
        }

        Ok(SynthesisReport {
            mode: SynthesisMode::PerArticle,
            audio,
            combined_audio_url: None,
            items,
        })
    }

    async fn synthesize_combined(&self, batch: &mut StoredBatch, logger: &Logger) -> Result<SynthesisReport> {
        let total = batch.len();
        let mut items = Vec::new();
        for (index, article) in batch.articles.iter_mut().enumerate() {
            let unsummarized = article
                .summary
                .as_deref()
                .map_or(true, |s| s.trim().is_empty());
            if unsummarized {
                let item_logger = logger.clone().with_prefix(format!("[{}/{}]", index + 1, total));
                items.push(self.summarize_article(article, &item_logger).await);
            }
        }
        if !items.is_empty() {
            logger.info(&format!("📝 Summarized {} articles before narration", items.len()));
        }

        let narration = CombinedNarration::from_articles(&batch.articles);
        self.storage.save_narration(&narration).await?;

        if narration.is_empty() {
            logger.warn("🔇 No real summaries to narrate");
            return Ok(SynthesisReport {
                mode: SynthesisMode::Combined,
                audio: Vec::new(),
                combined_audio_url: None,
                items,
            });
        }

        logger.info(&format!(
            "🗣️ Narrating {} characters in one request",
            narration.summaries.chars().count()
        ));
        let outcome = self.speak(&narration.summaries).await;
        let combined_audio_url = match outcome.value {
            Some(clip) => Some(
                self.audio
                    .save(&AudioStore::combined_file_name(clip.format), &clip)
                    .await?,
            ),
            None => None,
        };

        Ok(SynthesisReport {
            mode: SynthesisMode::Combined,
            audio: Vec::new(),
            combined_audio_url,
            items,
        })
    }

    async fn speak(&self, text: &str) -> FallbackOutcome<AudioClip> {
        let primary = &*self.registry.speech.primary;
        let fallback = &*self.registry.speech.fallback;
        self.executor
            .run(
                "speech",
                (primary.name(), move || async move { primary.synthesize(text).await }),
                (fallback.name(), move || async move { fallback.synthesize(text).await }),
            )
            .await
    }
}
