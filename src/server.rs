//! HTTP surface over the search pipeline.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::error::SearchError;
use crate::search;
use crate::types::*;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", post(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP status for a fatal pipeline error.
pub fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        SearchError::Status { .. } | SearchError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        SearchError::Config(_) => StatusCode::BAD_REQUEST,
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "post-scout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        let message = rejection.body_text();
        info!("rejected search request: {}", message);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: message }),
        )
    })?;

    let fail = |e: SearchError| {
        error!("Search error: {}", e);
        (
            status_for(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    };

    let backend = search::resolve_backend(&state, request.backend.as_deref()).map_err(fail)?;
    let query = search::resolve_query(
        &state,
        &request.query,
        request.min_engagement,
        request.limit,
    );

    let response = search::search_posts(&state, backend, &query)
        .await
        .map_err(fail)?;
    info!("search '{}' returned {} posts", query.text, response.count);
    Ok(Json(response))
}
