use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Routes for the stage triggers plus static audio under `/audio`. When
/// `public_dir` is given it is served for every other path.
pub fn create_app(state: AppState, audio_dir: &Path, public_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::permissive();

    let router = Router::new()
        .route("/fetch-news", get(handlers::fetch_news))
        .route("/summarize-news", get(handlers::summarize_news))
        .route("/generate-audio", get(handlers::generate_audio))
        .route("/api/articles", get(handlers::list_articles))
        .route("/health", get(handlers::health))
        .nest_service("/audio", ServeDir::new(audio_dir));

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}

pub mod prelude {
    pub use crate::{create_app, serve, ApiError, AppState};
    pub use nt_core::{Article, Error, Result};
}
