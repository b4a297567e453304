use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ferropix_core::ClientCacheConfig;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ServerResult,
    resizer::{ImageResizer, ResizeRequest},
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub resizer: Arc<ImageResizer>,
    pub cache: ClientCacheConfig,
}

/// Query parameters for a media request.
#[derive(Debug, Deserialize)]
pub struct MediaQuery {
    /// Size token: predefined name or `WxH` literal (default: original).
    #[serde(default = "default_size")]
    pub size: String,
    /// Output format token (default: png).
    #[serde(default)]
    pub format: String,
    /// Resize mode token (default: crop).
    #[serde(default)]
    pub mode: String,
    /// Videos are served untouched.
    #[serde(default)]
    pub video: bool,
}

fn default_size() -> String {
    "original".to_string()
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/media/:container/*key", get(serve_media))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ferropix",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve an object, resized per the query parameters.
async fn serve_media(
    State(state): State<AppState>,
    Path((container, key)): Path<(String, String)>,
    Query(query): Query<MediaQuery>,
) -> ServerResult<Response> {
    let media = state
        .resizer
        .resize(ResizeRequest {
            container,
            key,
            size: query.size,
            format: query.format,
            mode: query.mode,
            is_video: query.video,
        })
        .await?;

    let cache_control = format!("public, max-age={}", state.cache.max_age_secs);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media.content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        Body::from_stream(media.body),
    )
        .into_response())
}
