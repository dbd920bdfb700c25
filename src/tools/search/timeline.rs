//! Walker for the GraphQL `SearchTimeline` response.
//!
//! The feed is a list of instructions, each optionally carrying entries, each
//! optionally wrapping one tweet result. Posts are mixed with cursors, ads
//! and tombstones, so an entry is only yielded when all three type tags
//! agree it is a tweet:
//!
//! * `content.entryType == "TimelineTimelineItem"`
//! * `content.itemContent.itemType == "TimelineTweet"`
//! * `content.itemContent.tweet_results.result.__typename == "Tweet"`
//!
//! A missing level anywhere means the entry is skipped, never that the batch fails.

use serde_json::Value;

use super::fields::lookup;

pub const INSTRUCTIONS_PATH: &str = "data.search_by_raw_query.search_timeline.timeline.instructions";
pub const ADD_ENTRIES: &str = "TimelineAddEntries";
pub const TIMELINE_ITEM: &str = "TimelineTimelineItem";
pub const TIMELINE_TWEET: &str = "TimelineTweet";
pub const TWEET_TYPENAME: &str = "Tweet";

fn tag<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

fn array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Tweet result objects of one timeline response, in feed order.
pub fn tweet_results(response: &Value) -> impl Iterator<Item = &Value> {
    array(response, INSTRUCTIONS_PATH)
        .iter()
        .filter(|instruction| tag(instruction, "type") == Some(ADD_ENTRIES))
        .flat_map(|instruction| array(instruction, "entries"))
        .filter_map(tweet_result)
}

/// The tweet result of a single entry, if it passes discrimination.
pub fn tweet_result(entry: &Value) -> Option<&Value> {
    let content = lookup(entry, "content")?;
    if tag(content, "entryType")? != TIMELINE_ITEM {
        return None;
    }
    let item = lookup(content, "itemContent")?;
    if tag(item, "itemType")? != TIMELINE_TWEET {
        return None;
    }
    let result = lookup(item, "tweet_results.result")?;
    if tag(result, "__typename")? != TWEET_TYPENAME {
        return None;
    }
    Some(result)
}
