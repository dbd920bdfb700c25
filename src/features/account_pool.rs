//! Account pool — logged-in sessions used by the `accounts` backend.
//!
//! Persisted as a JSON array (default `~/.post-scout/accounts.json`), one
//! entry per account with the two session cookies the web client needs:
//!
//! ```json
//! [{ "username": "scout1", "auth_token": "…", "ct0": "…", "active": true }]
//! ```
//!
//! The pool is only read here. Logging accounts in and rotating them is done
//! by whatever tool writes the file.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::core::error::SearchError;

fn default_active() -> bool {
    true
}

/// One logged-in account.
#[derive(Clone, Deserialize)]
pub struct Account {
    pub username: String,
    /// `auth_token` session cookie. Never logged.
    pub auth_token: String,
    /// `ct0` cookie, doubling as the CSRF token header.
    pub ct0: String,
    /// Accounts marked inactive (locked, suspended) are skipped.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("active", &self.active)
            .finish()
    }
}

impl Account {
    fn is_usable(&self) -> bool {
        self.active && !self.auth_token.trim().is_empty() && !self.ct0.trim().is_empty()
    }

    /// `Cookie` header value for this session.
    pub fn cookie_header(&self) -> String {
        format!("auth_token={}; ct0={}", self.auth_token, self.ct0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountPool {
    accounts: Vec<Account>,
}

impl AccountPool {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Load the pool file. A missing file is an empty pool; an unreadable or
    /// malformed one is a configuration error.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("account pool {} not found", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SearchError::Config(format!(
                    "cannot read account pool {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let accounts: Vec<Account> = serde_json::from_str(&contents).map_err(|e| {
            SearchError::Config(format!(
                "cannot parse account pool {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(
            "account pool loaded from {}: {} accounts",
            path.display(),
            accounts.len()
        );
        Ok(Self::new(accounts))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// First active account with both cookies present.
    pub fn pick(&self) -> Option<&Account> {
        self.accounts.iter().find(|a| a.is_usable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn account(name: &str, active: bool) -> Account {
        Account {
            username: name.to_string(),
            auth_token: format!("{}-token", name),
            ct0: format!("{}-ct0", name),
            active,
        }
    }

    #[test]
    fn pick_skips_inactive_and_incomplete_accounts() {
        let mut broken = account("broken", true);
        broken.ct0.clear();
        let pool = AccountPool::new(vec![account("locked", false), broken, account("ok", true)]);
        assert_eq!(pool.pick().map(|a| a.username.as_str()), Some("ok"));
    }

    #[test]
    fn missing_file_is_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        let pool = AccountPool::load(&dir.path().join("accounts.json")).unwrap();
        assert!(pool.is_empty());
        assert!(pool.pick().is_none());
    }

    #[test]
    fn file_is_parsed_with_active_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{ "username": "a", "auth_token": "t", "ct0": "c" }}]"#
        )
        .unwrap();
        let pool = AccountPool::load(file.path()).unwrap();
        assert_eq!(pool.len(), 1);
        let picked = pool.pick().unwrap();
        assert!(picked.active);
        assert_eq!(picked.cookie_header(), "auth_token=t; ct0=c");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{").unwrap();
        assert!(matches!(
            AccountPool::load(file.path()),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn debug_output_hides_cookies() {
        let rendered = format!("{:?}", account("a", true));
        assert!(!rendered.contains("a-token"));
    }
}
