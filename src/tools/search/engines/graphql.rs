//! `SearchTimeline` request shared by the guest and account backends.

use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::core::error::SearchError;
use crate::tools::search::timeline;
use crate::types::SearchQuery;
use crate::AppState;

/// Largest page the endpoint serves in one response.
pub const MAX_PAGE_SIZE: usize = 100;

/// Feature flags the web client sends with `SearchTimeline`. The endpoint
/// rejects requests that omit any of them.
pub fn search_features() -> Value {
    json!({
        "rweb_tipjar_consumption_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "responsive_web_graphql_timeline_navigation_enabled": true,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "communities_web_enable_tweet_community_results_fetch": true,
        "c9s_tweet_anatomy_moderator_badge_enabled": true,
        "articles_preview_enabled": true,
        "responsive_web_edit_tweet_api_enabled": true,
        "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
        "view_counts_everywhere_api_enabled": true,
        "longform_notetweets_consumption_enabled": true,
        "responsive_web_twitter_article_tweet_consumption_enabled": true,
        "tweet_awards_web_tipping_enabled": false,
        "creator_subscriptions_quote_tweet_preview_enabled": false,
        "freedom_of_speech_not_reach_fetch_enabled": true,
        "standardized_nudges_misinfo": true,
        "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
        "rweb_video_timestamps_enabled": true,
        "longform_notetweets_rich_text_read_enabled": true,
        "longform_notetweets_inline_media_enabled": true,
        "responsive_web_enhance_cards_enabled": false
    })
}

pub fn search_variables(query: &SearchQuery) -> Value {
    json!({
        "rawQuery": query.text,
        "count": query.limit.min(MAX_PAGE_SIZE),
        "querySource": "typed_query",
        "product": "Top"
    })
}

/// Full request URL with `variables` and `features` encoded as query parameters.
pub fn search_url(base: &str, query: &SearchQuery) -> Result<url::Url, SearchError> {
    let mut url = url::Url::parse(base)
        .map_err(|e| SearchError::Config(format!("invalid search url '{}': {}", base, e)))?;
    url.query_pairs_mut()
        .append_pair("variables", &search_variables(query).to_string())
        .append_pair("features", &search_features().to_string());
    Ok(url)
}

/// `Authorization` + web-client headers common to every call.
pub fn base_headers(bearer_token: &str) -> Result<HeaderMap, SearchError> {
    let mut headers = HeaderMap::new();
    insert(&mut headers, "authorization", &format!("Bearer {}", bearer_token))?;
    insert(&mut headers, "user-agent", crate::antibot::get_random_user_agent())?;
    for (k, v) in crate::antibot::get_web_client_headers() {
        insert(&mut headers, k, v)?;
    }
    Ok(headers)
}

pub fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), SearchError> {
    let value = value
        .parse()
        .map_err(|_| SearchError::Config(format!("value for header '{}' is not valid", name)))?;
    headers.insert(name, value);
    Ok(())
}

/// Run one `SearchTimeline` request and return the tweet results it contains.
pub async fn run_search(
    state: &AppState,
    search_base: &str,
    headers: HeaderMap,
    query: &SearchQuery,
) -> Result<Vec<Value>, SearchError> {
    let url = search_url(search_base, query)?;
    debug!("SearchTimeline request for '{}'", query.text);

    let resp = state
        .http_client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| SearchError::from_request("search", state.http_timeout_secs, e))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| SearchError::from_request("search", state.http_timeout_secs, e))?;

    if !status.is_success() {
        return Err(SearchError::status(
            "search endpoint",
            i64::from(status.as_u16()),
            &body,
        ));
    }

    let data: Value = serde_json::from_str(&body)
        .map_err(|e| SearchError::InvalidResponse(format!("search body is not JSON: {}", e)))?;

    let results: Vec<Value> = timeline::tweet_results(&data).cloned().collect();
    info!("SearchTimeline returned {} tweet results", results.len());
    Ok(results)
}
