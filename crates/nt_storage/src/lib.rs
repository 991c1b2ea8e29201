use nt_core::{BatchStorage, Error, Result};
use std::path::Path;
use std::sync::Arc;

pub mod atomic;
pub mod audio;
pub mod backends;

pub use audio::AudioStore;
pub use backends::*;

/// Builds the batch store named on the command line.
pub fn create_storage(kind: &str, data_dir: &Path) -> Result<Arc<dyn BatchStorage>> {
    match kind {
        "json" | "file" => Ok(Arc::new(JsonFileStorage::new(JsonFileConfig::new(data_dir)))),
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(Error::Configuration(format!(
            "Unknown storage backend: {} (expected json or memory)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, AudioStore};
}
