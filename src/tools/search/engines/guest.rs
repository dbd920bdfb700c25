use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::graphql;
use crate::core::error::SearchError;
use crate::tools::search::QueryExecutor;
use crate::types::SearchQuery;
use crate::AppState;

/// Unauthenticated GraphQL search: bootstrap a guest token from the bearer
/// token, then run one `SearchTimeline` page with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuestGraphqlExecutor;

/// Exchange the app bearer token for a short-lived guest token.
pub async fn activate_guest_token(
    state: &AppState,
    activate_url: &str,
    bearer_token: &str,
) -> Result<String, SearchError> {
    let resp = state
        .http_client
        .post(activate_url)
        .headers(graphql::base_headers(bearer_token)?)
        .send()
        .await
        .map_err(|e| SearchError::from_request("guest token", state.http_timeout_secs, e))?;

    let status = resp.status();
    if !status.is_success() {
        warn!("guest token activation failed with {}", status);
        return Err(SearchError::Unavailable(format!(
            "failed to get guest token: {}",
            status.as_u16()
        )));
    }

    let body: Value = resp.json().await.map_err(|e| {
        SearchError::Unavailable(format!("failed to get guest token: unreadable body: {}", e))
    })?;

    body.get("guest_token")
        .and_then(|t| match t {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            SearchError::Unavailable("failed to get guest token: no guest_token in response".into())
        })
}

#[async_trait]
impl QueryExecutor for GuestGraphqlExecutor {
    fn name(&self) -> &'static str {
        "guest"
    }

    async fn fetch(
        &self,
        state: &AppState,
        query: &SearchQuery,
    ) -> Result<Vec<Value>, SearchError> {
        let cfg = &state.config.graphql;
        let bearer_token = cfg.resolve_bearer_token()?;

        let guest_token =
            activate_guest_token(state, &cfg.resolve_activate_url(), &bearer_token).await?;
        info!("guest token acquired");

        let mut headers = graphql::base_headers(&bearer_token)?;
        graphql::insert(&mut headers, "x-guest-token", &guest_token)?;

        graphql::run_search(state, &cfg.resolve_search_url(), headers, query).await
    }
}
