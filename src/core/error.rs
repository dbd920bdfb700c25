use thiserror::Error;

/// Longest slice of an upstream diagnostic body carried into an error message.
pub const DIAGNOSTIC_BODY_CHARS: usize = 200;

/// Fatal outcomes of a search. Item-level problems never show up here; those
/// items are skipped.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{what} timed out after {secs}s - try a more specific query")]
    Timeout { what: String, secs: u64 },

    #[error("{source_name} returned {status}: {body}")]
    Status {
        source_name: String,
        status: i64,
        body: String,
    },

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SearchError {
    pub fn status(source_name: &str, status: i64, body: &str) -> Self {
        SearchError::Status {
            source_name: source_name.to_string(),
            status,
            body: truncate_chars(body.trim(), DIAGNOSTIC_BODY_CHARS),
        }
    }

    /// Map a transport failure, keeping client-side timeouts distinct.
    pub fn from_request(what: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout {
                what: what.to_string(),
                secs: timeout_secs,
            }
        } else {
            SearchError::Unavailable(format!("{} request failed: {}", what, err))
        }
    }
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
