pub mod error;
pub mod fallback;
pub mod models;
pub mod sources;
pub mod speech;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use fallback::{FallbackExecutor, FallbackOutcome, ProviderFailure, ProviderUsed};
pub use models::Summarizer;
pub use sources::NewsSource;
pub use speech::SpeechSynthesizer;
pub use storage::BatchStorage;
pub use types::{Article, AudioClip, AudioFormat, CombinedNarration, NewsQuery, StoredBatch};
