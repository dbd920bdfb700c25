pub mod engines;
pub mod fields;
pub mod filter;
pub mod normalize;
mod service;
pub mod timeline;

use crate::core::error::SearchError;
use crate::types::*;
use crate::AppState;
use tracing::{debug, info};

pub use engines::Backend;
pub use filter::EngagementFilter;
pub use service::QueryExecutor;

/// Query plus the caller's optional overrides, resolved against config defaults.
pub fn resolve_query(
    state: &AppState,
    text: &str,
    min_engagement: Option<u64>,
    limit: Option<usize>,
) -> SearchQuery {
    let min_engagement =
        min_engagement.unwrap_or_else(|| state.config.resolve_min_engagement());
    let limit = limit.unwrap_or_else(|| state.config.resolve_limit());
    SearchQuery::new(text)
        .with_min_engagement(min_engagement)
        .with_limit(limit)
}

/// Backend from an explicit override, else from config.
pub fn resolve_backend(state: &AppState, backend: Option<&str>) -> Result<Backend, SearchError> {
    match backend {
        Some(b) => b.parse(),
        None => state.config.resolve_backend().parse(),
    }
}

/// Normalize raw items and apply the engagement filter.
pub fn build_response(
    items: &[serde_json::Value],
    query: &SearchQuery,
    url_base: &str,
) -> SearchResponse {
    let filter = EngagementFilter::new(query.min_engagement, query.limit);
    let records = items.iter().filter_map(|item| {
        let record = normalize::normalize(item, url_base);
        if let Some(r) = &record {
            if !filter.accepts(r) {
                debug!(
                    "dropping post '{}' with engagement {} below {}",
                    r.id(),
                    r.engagement(),
                    query.min_engagement
                );
            }
        }
        record
    });
    SearchResponse::new(filter.apply(records))
}

/// Run the whole pipeline against one executor.
pub async fn search_with(
    state: &AppState,
    executor: &dyn QueryExecutor,
    query: &SearchQuery,
) -> Result<SearchResponse, SearchError> {
    if query.text.trim().is_empty() {
        return Err(SearchError::Config("query must not be empty".into()));
    }

    info!(
        "searching '{}' via {} (min_engagement={}, limit={})",
        query.text,
        executor.name(),
        query.min_engagement,
        query.limit
    );

    let items = executor.fetch(state, query).await?;
    let response = build_response(&items, query, &state.config.resolve_post_url_base());

    info!(
        "{} of {} raw items kept for '{}'",
        response.count,
        items.len(),
        query.text
    );
    Ok(response)
}

pub async fn search_posts(
    state: &AppState,
    backend: Backend,
    query: &SearchQuery,
) -> Result<SearchResponse, SearchError> {
    let executor = backend.executor();
    search_with(state, executor.as_ref(), query).await
}
