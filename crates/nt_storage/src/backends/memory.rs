use async_trait::async_trait;
use nt_core::{BatchStorage, CombinedNarration, Result, StoredBatch};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    batch: Option<StoredBatch>,
    narration: Option<CombinedNarration>,
    replace_count: usize,
}

impl MemoryStore {
    pub fn replace(&mut self, batch: &StoredBatch) {
        self.batch = Some(batch.clone());
        self.replace_count += 1;
    }
}

/// Process-local batch store. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(batch: StoredBatch) -> Self {
        let store = MemoryStore {
            batch: Some(batch),
            ..Default::default()
        };
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Number of `replace` calls seen so far
    pub async fn replace_count(&self) -> usize {
        self.store.read().await.replace_count
    }

    pub async fn narration(&self) -> Option<CombinedNarration> {
        self.store.read().await.narration.clone()
    }
}

#[async_trait]
impl BatchStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<StoredBatch>> {
        Ok(self.store.read().await.batch.clone())
    }

    async fn replace(&self, batch: &StoredBatch) -> Result<()> {
        self.store.write().await.replace(batch);
        Ok(())
    }

    async fn save_narration(&self, narration: &CombinedNarration) -> Result<()> {
        self.store.write().await.narration = Some(narration.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::{Article, NewsQuery};

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        let batch = StoredBatch::new(
            &NewsQuery::new("politics", None),
            vec![Article::new("Test Article", Some("About politics.".to_string()), "http://test.com")],
        );
        storage.replace(&batch).await.unwrap();

        let loaded = storage.load().await.unwrap().unwrap();
        assert_eq!(loaded, batch);
        assert_eq!(storage.replace_count().await, 1);
    }
}
