use nt_core::{Article, AudioClip, AudioFormat, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::debug;

use crate::atomic::write_atomic;

pub const COMBINED_AUDIO_STEM: &str = "combined_summaries";
/// Route the audio directory is published under
pub const AUDIO_URL_PREFIX: &str = "/audio";
const MAX_STEM_CHARS: usize = 60;

/// Directory of generated audio, published under [`AUDIO_URL_PREFIX`].
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deterministic file name for an article's audio: the sanitized title plus
    /// a short hash of title and url, so equal titles from different articles
    /// do not overwrite each other.
    pub fn article_file_name(article: &Article, format: AudioFormat) -> String {
        let mut stem: String = article
            .title
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .take(MAX_STEM_CHARS)
            .collect();
        if stem.trim_matches('_').is_empty() {
            stem = "article".to_string();
        }

        let mut hasher = Sha256::new();
        hasher.update(article.title.as_bytes());
        hasher.update(b"\n");
        hasher.update(article.url.as_bytes());
        let digest = hasher.finalize();
        let short: String = digest.iter().take(4).map(|b| format!("{:02x}", b)).collect();

        format!("{}-{}.{}", stem, short, format.extension())
    }

    pub fn combined_file_name(format: AudioFormat) -> String {
        format!("{}.{}", COMBINED_AUDIO_STEM, format.extension())
    }

    /// Writes the clip and returns its public url.
    pub async fn save(&self, file_name: &str, clip: &AudioClip) -> Result<String> {
        let path = self.dir.join(file_name);
        write_atomic(&path, &clip.data).await?;
        debug!("🔊 Wrote {} bytes of audio to {}", clip.data.len(), path.display());
        Ok(format!("{}/{}", AUDIO_URL_PREFIX, file_name))
    }
}
