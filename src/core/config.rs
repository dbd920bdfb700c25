use std::path::PathBuf;

use super::error::SearchError;
use super::types::{DEFAULT_LIMIT, DEFAULT_MIN_ENGAGEMENT};

// ---------------------------------------------------------------------------
// ScoutConfig — file-based config loader (post-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "POST_SCOUT_CONFIG";
pub const ENV_BACKEND: &str = "POST_SCOUT_BACKEND";
pub const ENV_MIN_ENGAGEMENT: &str = "POST_SCOUT_MIN_ENGAGEMENT";
pub const ENV_LIMIT: &str = "POST_SCOUT_LIMIT";
pub const ENV_POST_URL_BASE: &str = "POST_SCOUT_POST_URL_BASE";
pub const ENV_BEARER_TOKEN: &str = "POST_SCOUT_BEARER_TOKEN";
pub const ENV_ACTIVATE_URL: &str = "POST_SCOUT_ACTIVATE_URL";
pub const ENV_SEARCH_URL: &str = "POST_SCOUT_SEARCH_URL";
pub const ENV_SCRAPER_PATH: &str = "POST_SCOUT_SCRAPER_PATH";
pub const ENV_SCRAPER_TIMEOUT: &str = "POST_SCOUT_SCRAPER_TIMEOUT_SECS";
pub const ENV_ACCOUNTS_FILE: &str = "POST_SCOUT_ACCOUNTS_FILE";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT: &str = "HTTP_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_BACKEND: &str = "guest";
pub const DEFAULT_POST_URL_BASE: &str = "https://twitter.com";
pub const DEFAULT_ACTIVATE_URL: &str = "https://api.twitter.com/1.1/guest/activate.json";
pub const DEFAULT_SEARCH_URL: &str =
    "https://twitter.com/i/api/graphql/lZ0GCEojmtQfiUQa5oJSEw/SearchTimeline";
pub const DEFAULT_SCRAPER_NAME: &str = "snscrape";
pub const DEFAULT_SCRAPER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Non-empty, trimmed env var.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

/// Non-empty config value.
fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// GraphQL sub-config (mirrors the `graphql` key in post-scout.json).
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct GraphqlConfig {
    /// App bearer token. Never logged. Required by the `guest` and `accounts` backends.
    pub bearer_token: Option<String>,
    pub activate_url: Option<String>,
    pub search_url: Option<String>,
}

impl GraphqlConfig {
    /// Bearer token: JSON field → `POST_SCOUT_BEARER_TOKEN` → configuration error.
    pub fn resolve_bearer_token(&self) -> Result<String, SearchError> {
        non_empty(&self.bearer_token)
            .or_else(|| env_string(ENV_BEARER_TOKEN))
            .ok_or_else(|| {
                SearchError::Config(format!(
                    "bearer token missing: set graphql.bearer_token in post-scout.json or {}",
                    ENV_BEARER_TOKEN
                ))
            })
    }

    /// Guest activation endpoint: JSON field → `POST_SCOUT_ACTIVATE_URL` → public default.
    pub fn resolve_activate_url(&self) -> String {
        non_empty(&self.activate_url)
            .or_else(|| env_string(ENV_ACTIVATE_URL))
            .unwrap_or_else(|| DEFAULT_ACTIVATE_URL.to_string())
    }

    /// SearchTimeline endpoint: JSON field → `POST_SCOUT_SEARCH_URL` → public default.
    pub fn resolve_search_url(&self) -> String {
        non_empty(&self.search_url)
            .or_else(|| env_string(ENV_SEARCH_URL))
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string())
    }
}

/// External scraper sub-config.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct ScraperConfig {
    pub executable: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ScraperConfig {
    /// Executable: JSON field → `POST_SCOUT_SCRAPER_PATH` → `snscrape` on PATH.
    ///
    /// An explicitly configured path that does not exist is an error rather
    /// than a silent PATH fallback.
    pub fn resolve_executable(&self) -> Result<PathBuf, SearchError> {
        if let Some(p) = non_empty(&self.executable).or_else(|| env_string(ENV_SCRAPER_PATH)) {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Ok(path);
            }
            return Err(SearchError::Unavailable(format!(
                "scraper not found at: {}",
                p
            )));
        }
        which::which(DEFAULT_SCRAPER_NAME).map_err(|_| {
            SearchError::Unavailable(format!(
                "scraper not found: '{}' is not on PATH and {} is unset",
                DEFAULT_SCRAPER_NAME, ENV_SCRAPER_PATH
            ))
        })
    }

    /// Subprocess wait bound: JSON field → `POST_SCOUT_SCRAPER_TIMEOUT_SECS` → 60.
    pub fn resolve_timeout_secs(&self) -> u64 {
        self.timeout_secs
            .or_else(|| env_parse(ENV_SCRAPER_TIMEOUT))
            .unwrap_or(DEFAULT_SCRAPER_TIMEOUT_SECS)
    }
}

/// Logged-in account pool sub-config.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct AccountsConfig {
    pub pool_file: Option<String>,
}

impl AccountsConfig {
    /// Pool file: JSON field → `POST_SCOUT_ACCOUNTS_FILE` → `~/.post-scout/accounts.json`.
    pub fn resolve_pool_file(&self) -> Option<PathBuf> {
        if let Some(p) = non_empty(&self.pool_file).or_else(|| env_string(ENV_ACCOUNTS_FILE)) {
            return Some(PathBuf::from(p));
        }
        let home = dirs::home_dir()?;
        Some(home.join(".post-scout").join("accounts.json"))
    }
}

/// Top-level config loaded from `post-scout.json`.
#[derive(serde::Deserialize, Default, Clone, Debug)]
#[serde(default)]
pub struct ScoutConfig {
    pub backend: Option<String>,
    pub min_engagement: Option<u64>,
    pub limit: Option<usize>,
    pub post_url_base: Option<String>,
    pub graphql: GraphqlConfig,
    pub scraper: ScraperConfig,
    pub accounts: AccountsConfig,
}

impl ScoutConfig {
    /// Backend name: JSON field → `POST_SCOUT_BACKEND` → `guest`.
    pub fn resolve_backend(&self) -> String {
        non_empty(&self.backend)
            .or_else(|| env_string(ENV_BACKEND))
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string())
    }

    pub fn resolve_min_engagement(&self) -> u64 {
        self.min_engagement
            .or_else(|| env_parse(ENV_MIN_ENGAGEMENT))
            .unwrap_or(DEFAULT_MIN_ENGAGEMENT)
    }

    pub fn resolve_limit(&self) -> usize {
        self.limit
            .or_else(|| env_parse(ENV_LIMIT))
            .unwrap_or(DEFAULT_LIMIT)
    }

    pub fn resolve_post_url_base(&self) -> String {
        non_empty(&self.post_url_base)
            .or_else(|| env_string(ENV_POST_URL_BASE))
            .unwrap_or_else(|| DEFAULT_POST_URL_BASE.to_string())
    }
}

/// HTTP client timeouts from `HTTP_TIMEOUT_SECS` / `HTTP_CONNECT_TIMEOUT_SECS`.
pub fn http_timeouts() -> (u64, u64) {
    (
        env_parse(ENV_HTTP_TIMEOUT).unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        env_parse(ENV_HTTP_CONNECT_TIMEOUT).unwrap_or(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
    )
}

/// Load `post-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `POST_SCOUT_CONFIG` env var path
/// 2. `./post-scout.json`
/// 3. `~/.post-scout/config.json`
///
/// Missing file → `ScoutConfig::default()` (silent, all env-var fallbacks apply).
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let mut candidates = vec![PathBuf::from("post-scout.json")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".post-scout").join("config.json"));
    }
    if let Some(env_path) = env_string(ENV_CONFIG_PATH) {
        candidates.insert(0, PathBuf::from(env_path));
    }

    for path in &candidates {
        match std::fs::read_to_string(path) {
            Ok(contents) => return parse_config(&contents, path),
            Err(_) => continue,
        }
    }

    ScoutConfig::default()
}

/// Load an explicitly named config file. Unlike [`load_scout_config`] a
/// missing or broken file is an error.
pub fn load_scout_config_from(path: &std::path::Path) -> Result<ScoutConfig, SearchError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        SearchError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| SearchError::Config(format!("cannot parse {}: {}", path.display(), e)))
}

fn parse_config(contents: &str, path: &std::path::Path) -> ScoutConfig {
    match serde_json::from_str::<ScoutConfig>(contents) {
        Ok(cfg) => {
            tracing::info!("post-scout config loaded from {}", path.display());
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "post-scout config parse error at {}: {} — using defaults",
                path.display(),
                e
            );
            ScoutConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_win_over_defaults() {
        let cfg: ScoutConfig = serde_json::from_str(
            r#"{
                "backend": "scraper",
                "min_engagement": 250,
                "limit": 7,
                "post_url_base": "https://x.com",
                "graphql": { "bearer_token": "abc", "search_url": "http://localhost/search" },
                "scraper": { "timeout_secs": 5 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_backend(), "scraper");
        assert_eq!(cfg.resolve_min_engagement(), 250);
        assert_eq!(cfg.resolve_limit(), 7);
        assert_eq!(cfg.resolve_post_url_base(), "https://x.com");
        assert_eq!(cfg.graphql.resolve_bearer_token().unwrap(), "abc");
        assert_eq!(cfg.graphql.resolve_search_url(), "http://localhost/search");
        assert_eq!(cfg.scraper.resolve_timeout_secs(), 5);
    }

    #[test]
    fn blank_bearer_token_in_file_is_not_accepted() {
        let cfg: ScoutConfig =
            serde_json::from_str(r#"{ "graphql": { "bearer_token": "   " } }"#).unwrap();
        if std::env::var(ENV_BEARER_TOKEN).is_err() {
            assert!(matches!(
                cfg.graphql.resolve_bearer_token(),
                Err(SearchError::Config(_))
            ));
        }
    }

    #[test]
    fn configured_scraper_path_must_exist() {
        let cfg = ScraperConfig {
            executable: Some("/definitely/not/here/snscrape".into()),
            timeout_secs: None,
        };
        let err = cfg.resolve_executable().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/snscrape"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "backend": "accounts" }}"#).unwrap();
        let cfg = load_scout_config_from(file.path()).unwrap();
        assert_eq!(cfg.resolve_backend(), "accounts");
    }

    #[test]
    fn broken_explicit_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_scout_config_from(file.path()),
            Err(SearchError::Config(_))
        ));
    }
}
