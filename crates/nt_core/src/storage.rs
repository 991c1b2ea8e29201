use async_trait::async_trait;
use crate::types::{CombinedNarration, StoredBatch};
use crate::Result;

#[async_trait]
pub trait BatchStorage: Send + Sync {
    /// Load the current batch, if one was ever stored
    async fn load(&self) -> Result<Option<StoredBatch>>;

    /// Replace the stored batch as a whole. Readers see either the old or the new batch.
    async fn replace(&self, batch: &StoredBatch) -> Result<()>;

    /// Persist the text used for the last combined narration
    async fn save_narration(&self, narration: &CombinedNarration) -> Result<()>;
}
