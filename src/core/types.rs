use serde::{Deserialize, Serialize};

use super::config::DEFAULT_POST_URL_BASE;

pub const DEFAULT_MIN_ENGAGEMENT: u64 = 10_000;
pub const DEFAULT_LIMIT: usize = 100;
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// One normalized post.
///
/// Fields are private so a record cannot drift from the engagement it was
/// built with; use [`PostRecord::new`] and the accessors. Deserializing goes
/// through [`PostFields`], so a stored `engagement` is recomputed, never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PostFields")]
pub struct PostRecord {
    id: String,
    text: String,
    author: String,
    likes: u64,
    retweets: u64,
    replies: u64,
    engagement: u64,
    url: String,
    created_at: String,
}

/// Constituent values of a [`PostRecord`] before the derived fields are filled in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostFields {
    pub id: String,
    pub text: String,
    pub author: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    /// Source-supplied link; empty means "build it from author + id".
    pub url: String,
    pub created_at: String,
}

impl PostRecord {
    /// Build a record, computing `engagement` and filling in `author`/`url` defaults.
    pub fn new(fields: PostFields, url_base: &str) -> Self {
        let author = if fields.author.trim().is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            fields.author
        };
        let url = if !fields.url.trim().is_empty() {
            fields.url
        } else if !fields.id.is_empty() {
            format!(
                "{}/{}/status/{}",
                url_base.trim_end_matches('/'),
                author,
                fields.id
            )
        } else {
            String::new()
        };
        let engagement = fields
            .likes
            .saturating_add(fields.retweets)
            .saturating_add(fields.replies);

        Self {
            id: fields.id,
            text: fields.text,
            author,
            likes: fields.likes,
            retweets: fields.retweets,
            replies: fields.replies,
            engagement,
            url,
            created_at: fields.created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn retweets(&self) -> u64 {
        self.retweets
    }

    pub fn replies(&self) -> u64 {
        self.replies
    }

    pub fn engagement(&self) -> u64 {
        self.engagement
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl From<PostFields> for PostRecord {
    fn from(fields: PostFields) -> Self {
        Self::new(fields, DEFAULT_POST_URL_BASE)
    }
}

/// Caller-facing search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub min_engagement: u64,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_engagement: DEFAULT_MIN_ENGAGEMENT,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_min_engagement(mut self, min_engagement: u64) -> Self {
        self.min_engagement = min_engagement;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub min_engagement: Option<u64>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Backend override: `guest`, `accounts` or `scraper`.
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tweets: Vec<PostRecord>,
    pub count: usize,
}

impl SearchResponse {
    pub fn new(tweets: Vec<PostRecord>) -> Self {
        let count = tweets.len();
        Self { tweets, count }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_is_sum_of_counts() {
        let record = PostRecord::new(
            PostFields {
                id: "1".into(),
                likes: 120,
                retweets: 30,
                replies: 5,
                ..Default::default()
            },
            "https://twitter.com",
        );
        assert_eq!(record.engagement(), 155);
    }

    #[test]
    fn missing_author_and_url_get_defaults() {
        let record = PostRecord::new(
            PostFields {
                id: "42".into(),
                author: "  ".into(),
                ..Default::default()
            },
            "https://twitter.com/",
        );
        assert_eq!(record.author(), "unknown");
        assert_eq!(record.url(), "https://twitter.com/unknown/status/42");
    }

    #[test]
    fn url_stays_empty_without_id() {
        let record = PostRecord::new(
            PostFields {
                author: "someone".into(),
                ..Default::default()
            },
            "https://twitter.com",
        );
        assert_eq!(record.url(), "");
    }

    #[test]
    fn engagement_saturates() {
        let record = PostRecord::new(
            PostFields {
                likes: u64::MAX,
                retweets: 1,
                ..Default::default()
            },
            "https://twitter.com",
        );
        assert_eq!(record.engagement(), u64::MAX);
    }

    #[test]
    fn deserialized_record_recomputes_engagement() {
        let record: PostRecord = serde_json::from_str(
            r#"{
                "id": "9", "text": "t", "author": "a",
                "likes": 1, "retweets": 0, "replies": 0,
                "engagement": 999999,
                "url": "https://twitter.com/a/status/9",
                "created_at": ""
            }"#,
        )
        .unwrap();
        assert_eq!(record.engagement(), 1);
        assert_eq!(record.url(), "https://twitter.com/a/status/9");
    }

    #[test]
    fn response_round_trips_through_constructor() {
        let original = SearchResponse::new(vec![PostRecord::new(
            PostFields {
                id: "3".into(),
                author: "z".into(),
                likes: 120,
                retweets: 30,
                replies: 5,
                ..Default::default()
            },
            "https://twitter.com",
        )]);
        let body = serde_json::to_string(&original).unwrap();
        let back: SearchResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(back.tweets, original.tweets);
        assert_eq!(back.tweets[0].engagement(), 155);
    }

    #[test]
    fn response_count_matches_tweets() {
        let body = serde_json::to_value(SearchResponse::new(Vec::new())).unwrap();
        assert_eq!(body, serde_json::json!({ "tweets": [], "count": 0 }));
    }
}
