use crate::core::error::SearchError;
use crate::types::SearchQuery;
use crate::AppState;
use async_trait::async_trait;
use serde_json::Value;

/// One upstream capable of answering a text query with raw post items.
///
/// Implementations make a single attempt and return the items in upstream
/// order; normalization and filtering happen in the caller.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, state: &AppState, query: &SearchQuery)
        -> Result<Vec<Value>, SearchError>;
}
