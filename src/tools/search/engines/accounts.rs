use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::graphql;
use crate::core::error::SearchError;
use crate::features::account_pool::AccountPool;
use crate::tools::search::QueryExecutor;
use crate::types::SearchQuery;
use crate::AppState;

/// Logged-in GraphQL search using the first usable account of the pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountGraphqlExecutor;

pub fn load_pool(state: &AppState) -> Result<AccountPool, SearchError> {
    let path = state.config.accounts.resolve_pool_file().ok_or_else(|| {
        SearchError::Config(
            "account pool location unknown: set accounts.pool_file or POST_SCOUT_ACCOUNTS_FILE"
                .into(),
        )
    })?;
    AccountPool::load(&path)
}

#[async_trait]
impl QueryExecutor for AccountGraphqlExecutor {
    fn name(&self) -> &'static str {
        "accounts"
    }

    async fn fetch(
        &self,
        state: &AppState,
        query: &SearchQuery,
    ) -> Result<Vec<Value>, SearchError> {
        let pool = load_pool(state)?;
        let account = pool.pick().ok_or_else(|| {
            SearchError::Unavailable(format!(
                "no accounts configured ({} in pool, none active); add logged-in accounts to the pool file",
                pool.len()
            ))
        })?;
        info!("searching as account '{}'", account.username);

        let cfg = &state.config.graphql;
        let mut headers = graphql::base_headers(&cfg.resolve_bearer_token()?)?;
        graphql::insert(&mut headers, "cookie", &account.cookie_header())?;
        graphql::insert(&mut headers, "x-csrf-token", &account.ct0)?;
        graphql::insert(&mut headers, "x-twitter-auth-type", "OAuth2Session")?;

        graphql::run_search(state, &cfg.resolve_search_url(), headers, query).await
    }
}
