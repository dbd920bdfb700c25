use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use super::fields;
use crate::types::{PostFields, PostRecord};

/// Legacy REST/GraphQL timestamp, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const LEGACY_TIMESTAMP: &str = "%a %b %d %H:%M:%S %z %Y";
const NAIVE_TIMESTAMPS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Turn one raw upstream item into a [`PostRecord`].
///
/// Works on both shapes the backends produce: flat scraper objects
/// (`rawContent`, `likeCount`, `user.username`, ...) and GraphQL tweet
/// results (`rest_id`, `legacy.*`, `core.user_results...`). Returns `None`
/// only when the item is not a JSON object at all.
pub fn normalize(item: &Value, url_base: &str) -> Option<PostRecord> {
    if !item.is_object() {
        debug!("skipping malformed item: expected object, got {}", kind(item));
        return None;
    }

    let created_raw = fields::CREATED_AT.string_or_default(item);
    let created_at = normalize_timestamp(&created_raw).unwrap_or_else(|| {
        if !created_raw.is_empty() {
            debug!("unrecognized timestamp '{}', leaving created_at empty", created_raw);
        }
        String::new()
    });

    let record = PostRecord::new(
        PostFields {
            id: fields::ID.string_or_default(item),
            text: fields::TEXT.string_or_default(item),
            author: fields::AUTHOR.string_or_default(item),
            likes: fields::LIKES.count_or_zero(item),
            retweets: fields::RETWEETS.count_or_zero(item),
            replies: fields::REPLIES.count_or_zero(item),
            url: fields::URL.string_or_default(item),
            created_at,
        },
        url_base,
    );
    Some(record)
}

/// Normalize an upstream timestamp to RFC 3339 in UTC. Naive values are taken as UTC.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed: Option<DateTime<Utc>> = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, LEGACY_TIMESTAMP))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_TIMESTAMPS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        });

    parsed.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://twitter.com";

    #[test]
    fn scraper_item_is_normalized() {
        let item = json!({
            "id": 1700000000000000000u64,
            "url": "https://twitter.com/rustlang/status/1700000000000000000",
            "date": "2023-09-08T12:00:00+00:00",
            "rawContent": "Rust 1.72 is out",
            "user": { "username": "rustlang" },
            "likeCount": 120,
            "retweetCount": 30,
            "replyCount": 5
        });
        let record = normalize(&item, BASE).unwrap();
        assert_eq!(record.id(), "1700000000000000000");
        assert_eq!(record.text(), "Rust 1.72 is out");
        assert_eq!(record.author(), "rustlang");
        assert_eq!(record.engagement(), 155);
        assert_eq!(
            record.url(),
            "https://twitter.com/rustlang/status/1700000000000000000"
        );
        assert_eq!(record.created_at(), "2023-09-08T12:00:00+00:00");
    }

    #[test]
    fn graphql_result_is_normalized() {
        let item = json!({
            "__typename": "Tweet",
            "rest_id": "99",
            "core": { "user_results": { "result": { "legacy": { "screen_name": "ferris" } } } },
            "legacy": {
                "full_text": "crab",
                "favorite_count": 10,
                "retweet_count": 2,
                "reply_count": 1,
                "created_at": "Wed Oct 10 20:19:24 +0000 2018"
            }
        });
        let record = normalize(&item, BASE).unwrap();
        assert_eq!(record.id(), "99");
        assert_eq!(record.author(), "ferris");
        assert_eq!(record.text(), "crab");
        assert_eq!(record.engagement(), 13);
        assert_eq!(record.url(), "https://twitter.com/ferris/status/99");
        assert_eq!(record.created_at(), "2018-10-10T20:19:24+00:00");
    }

    #[test]
    fn missing_counts_are_zero() {
        let item = json!({ "rest_id": "1", "legacy": { "favorite_count": 7, "reply_count": null } });
        let record = normalize(&item, BASE).unwrap();
        assert_eq!(record.likes(), 7);
        assert_eq!(record.retweets(), 0);
        assert_eq!(record.replies(), 0);
        assert_eq!(record.engagement(), 7);
    }

    #[test]
    fn non_object_items_are_dropped() {
        assert!(normalize(&json!("nope"), BASE).is_none());
        assert!(normalize(&json!([1, 2]), BASE).is_none());
        assert!(normalize(&Value::Null, BASE).is_none());
    }

    #[test]
    fn empty_object_gets_every_default() {
        let record = normalize(&json!({}), BASE).unwrap();
        assert_eq!(record.id(), "");
        assert_eq!(record.text(), "");
        assert_eq!(record.author(), "unknown");
        assert_eq!(record.engagement(), 0);
        assert_eq!(record.url(), "");
        assert_eq!(record.created_at(), "");
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        assert_eq!(
            normalize_timestamp("2024-01-02T03:04:05+02:00").as_deref(),
            Some("2024-01-02T01:04:05+00:00")
        );
        assert_eq!(
            normalize_timestamp("2024-01-02 03:04:05").as_deref(),
            Some("2024-01-02T03:04:05+00:00")
        );
        assert_eq!(normalize_timestamp("yesterday"), None);
        assert_eq!(normalize_timestamp(""), None);
    }
}
