use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder stored when a provider returns an article without description.
pub const DESCRIPTION_UNAVAILABLE: &str = "No description available";
/// Summary given to articles that had nothing to summarize.
pub const NO_DESCRIPTION_SUMMARY: &str = "No description available.";
/// Summary given to articles when every summarizer failed.
pub const NO_SUMMARY: &str = "No summary available.";
/// Marker inserted between summaries in a combined narration.
pub const PAUSE_MARKER: &str = ". ... Pause ... ";

pub const BATCH_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default = "description_unavailable")]
    pub description: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

fn description_unavailable() -> String {
    DESCRIPTION_UNAVAILABLE.to_string()
}

impl Article {
    /// Builds a fresh article as produced by a news source. Blank descriptions
    /// collapse to [`DESCRIPTION_UNAVAILABLE`].
    pub fn new(title: impl Into<String>, description: Option<String>, url: impl Into<String>) -> Self {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(description_unavailable);
        Self {
            title: title.into(),
            description,
            url: url.into(),
            summary: None,
            audio_url: None,
        }
    }

    /// True when the description carries text worth sending to a summarizer.
    pub fn has_description(&self) -> bool {
        let description = self.description.trim();
        !description.is_empty()
            && description != DESCRIPTION_UNAVAILABLE
            && description != NO_DESCRIPTION_SUMMARY
    }

    /// True when the summary is model output rather than absent or a sentinel.
    pub fn has_real_summary(&self) -> bool {
        match self.summary.as_deref().map(str::trim) {
            Some(summary) => {
                !summary.is_empty() && summary != NO_SUMMARY && summary != NO_DESCRIPTION_SUMMARY
            }
            None => false,
        }
    }
}

/// The persisted batch: every article of one fetch cycle plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBatch {
    pub version: u32,
    pub batch_id: Uuid,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub articles: Vec<Article>,
}

impl StoredBatch {
    pub fn new(query: &NewsQuery, articles: Vec<Article>) -> Self {
        Self {
            version: BATCH_SCHEMA_VERSION,
            batch_id: Uuid::new_v4(),
            fetched_at: Utc::now(),
            keyword: query.keyword.clone(),
            category: query.category.clone(),
            articles,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// On-disk layouts accepted when reading the state document. Older files hold
/// a bare array of articles.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BatchDocument {
    Versioned(StoredBatch),
    Legacy(Vec<Article>),
}

impl From<BatchDocument> for StoredBatch {
    fn from(document: BatchDocument) -> Self {
        match document {
            BatchDocument::Versioned(batch) => batch,
            BatchDocument::Legacy(articles) => StoredBatch {
                version: BATCH_SCHEMA_VERSION,
                batch_id: Uuid::new_v4(),
                fetched_at: Utc::now(),
                keyword: String::new(),
                category: None,
                articles,
            },
        }
    }
}

/// Text of every real summary joined for a single synthesis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedNarration {
    pub summaries: String,
}

impl CombinedNarration {
    pub fn from_articles(articles: &[Article]) -> Self {
        let summaries = articles
            .iter()
            .filter(|a| a.has_real_summary())
            .filter_map(|a| a.summary.as_deref())
            .collect::<Vec<_>>()
            .join(PAUSE_MARKER);
        Self { summaries }
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsQuery {
    pub keyword: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewsQuery {
    pub fn new(keyword: impl Into<String>, category: Option<String>) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Opus,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
        }
    }
}

/// Encoded audio returned by a speech provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
