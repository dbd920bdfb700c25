//! Optional-field accessors for loosely typed upstream JSON.
//!
//! Every field a [`PostRecord`](crate::types::PostRecord) is built from is
//! described by a [`FieldChain`] or [`CountChain`]: an ordered list of dotted
//! paths tried in turn, plus the value used when none of them resolves
//! (counts always default to 0). Keeping the chains
//! as data makes the fallback policy visible in one place and lets each one
//! be tested without a full upstream payload.
//!
//! A path resolves when every segment exists and the leaf is not `null`.
//! Empty strings are treated as absent. Numeric leaves count as present for
//! string fields (ids are sometimes numbers), and numeric strings count as
//! present for count fields.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub paths: &'static [&'static str],
    pub default: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CountChain {
    pub paths: &'static [&'static str],
}

pub const ID: FieldChain = FieldChain {
    paths: &["id_str", "rest_id", "id", "legacy.id_str"],
    default: "",
};

pub const TEXT: FieldChain = FieldChain {
    paths: &[
        "content",
        "rawContent",
        "legacy.full_text",
        "full_text",
        "text",
    ],
    default: "",
};

pub const AUTHOR: FieldChain = FieldChain {
    paths: &[
        "user.username",
        "user.screen_name",
        "core.user_results.result.legacy.screen_name",
        "core.user_results.result.core.screen_name",
    ],
    default: crate::types::UNKNOWN_AUTHOR,
};

pub const LIKES: CountChain = CountChain {
    paths: &["likeCount", "legacy.favorite_count", "favorite_count"],
};

pub const RETWEETS: CountChain = CountChain {
    paths: &["retweetCount", "legacy.retweet_count", "retweet_count"],
};

pub const REPLIES: CountChain = CountChain {
    paths: &["replyCount", "legacy.reply_count", "reply_count"],
};

pub const URL: FieldChain = FieldChain {
    paths: &["url"],
    default: "",
};

pub const CREATED_AT: FieldChain = FieldChain {
    paths: &["date", "legacy.created_at", "created_at"],
    default: "",
};

/// Walk a dotted path; `None` when any segment is missing or the leaf is null.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl FieldChain {
    /// First path that resolves to a string or number.
    pub fn string(&self, item: &Value) -> Option<String> {
        self.paths
            .iter()
            .filter_map(|p| lookup(item, p))
            .find_map(as_text)
    }

    pub fn string_or_default(&self, item: &Value) -> String {
        self.string(item)
            .unwrap_or_else(|| self.default.to_string())
    }
}

impl CountChain {
    /// First path that resolves to a non-negative integer.
    ///
    /// Negative or non-numeric values do not stop the chain; later paths are
    /// still tried before falling back to the default.
    pub fn count(&self, item: &Value) -> Option<u64> {
        self.paths
            .iter()
            .filter_map(|p| lookup(item, p))
            .find_map(as_count)
    }

    pub fn count_or_zero(&self, item: &Value) -> u64 {
        self.count(item).unwrap_or(0)
    }
}
