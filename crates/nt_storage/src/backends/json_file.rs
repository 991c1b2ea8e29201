use async_trait::async_trait;
use nt_core::types::BatchDocument;
use nt_core::{BatchStorage, CombinedNarration, Result, StoredBatch};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::atomic::write_atomic;

#[derive(Debug, Clone)]
pub struct JsonFileConfig {
    pub batch_path: PathBuf,
    pub narration_path: PathBuf,
}

impl JsonFileConfig {
    /// `news.json` and `summaries.json` inside `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            batch_path: data_dir.join("news.json"),
            narration_path: data_dir.join("summaries.json"),
        }
    }
}

/// State store backed by pretty-printed JSON documents on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    config: JsonFileConfig,
}

impl JsonFileStorage {
    pub fn new(config: JsonFileConfig) -> Self {
        Self { config }
    }

    pub fn batch_path(&self) -> &Path {
        &self.config.batch_path
    }
}

#[async_trait]
impl BatchStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<StoredBatch>> {
        let raw = match tokio::fs::read(&self.config.batch_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let document: BatchDocument = serde_json::from_slice(&raw)?;
        Ok(Some(document.into()))
    }

    async fn replace(&self, batch: &StoredBatch) -> Result<()> {
        let json = serde_json::to_vec_pretty(batch)?;
        write_atomic(&self.config.batch_path, &json).await?;
        debug!(
            "💾 Stored batch {} ({} articles) at {}",
            batch.batch_id,
            batch.len(),
            self.config.batch_path.display()
        );
        Ok(())
    }

    async fn save_narration(&self, narration: &CombinedNarration) -> Result<()> {
        let json = serde_json::to_vec_pretty(narration)?;
        write_atomic(&self.config.narration_path, &json).await
    }
}
