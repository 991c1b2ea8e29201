use async_trait::async_trait;
use crate::Result;

/// Instruction shared by every summarizer.
pub const SUMMARY_INSTRUCTION: &str = "Summarize this article in 2 sentences:";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name used in logs and failure records
    fn name(&self) -> &str;

    /// Summarize an article description
    async fn summarize(&self, text: &str) -> Result<String>;
}
