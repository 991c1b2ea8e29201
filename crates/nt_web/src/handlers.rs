use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use nt_core::{Article, NewsQuery};
use nt_pipeline::{AudioRef, SynthesisMode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::error::ApiError;
use crate::AppState;

const FETCH_FAILED: &str = "Failed to fetch news";
const SUMMARIZE_FAILED: &str = "Summarization failed";
const TTS_FAILED: &str = "TTS failed";

#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    #[serde(default)]
    pub keyword: String,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AudioParams {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub success: bool,
    pub message: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub message: String,
    pub summaries: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<AudioRef>>,
}

pub async fn fetch_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FetchParams>,
) -> Result<Json<FetchResponse>, ApiError> {
    let query = NewsQuery::new(params.keyword, params.category);
    let report = state.pipeline.fetch(query).await.map_err(|e| {
        error!("❌ Error fetching news: {}", e);
        ApiError::Stage(FETCH_FAILED)
    })?;

    Ok(Json(FetchResponse {
        success: true,
        message: format!("News fetched and stored! ({} via {})", report.batch.len(), report.provider),
        articles: report.batch.articles,
    }))
}

pub async fn summarize_news(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let report = state.pipeline.summarize().await.map_err(|e| {
        error!("❌ Error summarizing news: {}", e);
        ApiError::Stage(SUMMARIZE_FAILED)
    })?;

    Ok(Json(SummarizeResponse {
        success: true,
        message: "News summarized!".to_string(),
        summaries: report.summaries,
    }))
}

pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AudioParams>,
) -> Result<Json<AudioResponse>, ApiError> {
    let mode = params
        .mode
        .as_deref()
        .map(str::parse::<SynthesisMode>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let report = state.pipeline.synthesize(mode).await.map_err(|e| {
        error!("❌ Error generating audio: {}", e);
        ApiError::Stage(TTS_FAILED)
    })?;

    let message = if report.produced_audio() {
        "Audio generated!"
    } else {
        "No audio could be generated for the current summaries"
    };
    let audio = match report.mode {
        SynthesisMode::PerArticle => Some(report.audio),
        SynthesisMode::Combined => None,
    };

    Ok(Json(AudioResponse {
        success: true,
        message: message.to_string(),
        audio_url: report.combined_audio_url,
        audio,
    }))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    match state.pipeline.current_batch().await {
        Ok(Some(batch)) => Ok(Json(batch)),
        Ok(None) => Err(ApiError::NotFound("No articles have been fetched yet")),
        Err(e) => {
            error!("❌ Error loading articles: {}", e);
            Err(ApiError::Stage("Failed to load articles"))
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
