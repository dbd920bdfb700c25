pub mod accounts;
pub mod graphql;
pub mod guest;
pub mod scraper;

use std::str::FromStr;

use super::QueryExecutor;
use crate::core::error::SearchError;

/// Upstream used to answer a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Guest-token GraphQL.
    Guest,
    /// Logged-in GraphQL via the account pool.
    Accounts,
    /// External scraper subprocess.
    Scraper,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Guest, Backend::Accounts, Backend::Scraper];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Guest => "guest",
            Backend::Accounts => "accounts",
            Backend::Scraper => "scraper",
        }
    }

    pub fn executor(&self) -> Box<dyn QueryExecutor> {
        match self {
            Backend::Guest => Box::new(guest::GuestGraphqlExecutor),
            Backend::Accounts => Box::new(accounts::AccountGraphqlExecutor),
            Backend::Scraper => Box::new(scraper::ScraperExecutor),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" | "graphql" => Ok(Backend::Guest),
            "accounts" | "account" => Ok(Backend::Accounts),
            "scraper" | "snscrape" => Ok(Backend::Scraper),
            other => Err(SearchError::Config(format!(
                "unknown backend '{}' (expected one of: guest, accounts, scraper)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_round_trip() {
        for b in Backend::ALL {
            assert_eq!(b.as_str().parse::<Backend>().unwrap(), b);
            assert_eq!(b.executor().name(), b.as_str());
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!(" GraphQL ".parse::<Backend>().unwrap(), Backend::Guest);
        assert_eq!("snscrape".parse::<Backend>().unwrap(), Backend::Scraper);
    }

    #[test]
    fn unknown_backend_is_config_error() {
        assert!(matches!(
            "carrier-pigeon".parse::<Backend>(),
            Err(SearchError::Config(_))
        ));
    }
}
