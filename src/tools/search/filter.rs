use crate::types::PostRecord;

/// Keeps records at or above an engagement threshold, in the order they
/// arrive, until `limit` records have been kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementFilter {
    pub min_engagement: u64,
    pub limit: usize,
}

impl EngagementFilter {
    pub fn new(min_engagement: u64, limit: usize) -> Self {
        Self {
            min_engagement,
            limit,
        }
    }

    pub fn accepts(&self, record: &PostRecord) -> bool {
        record.engagement() >= self.min_engagement
    }

    /// The source is not pulled past the `limit`-th accepted record.
    pub fn apply<I>(&self, records: I) -> Vec<PostRecord>
    where
        I: IntoIterator<Item = PostRecord>,
    {
        records
            .into_iter()
            .filter(|r| self.accepts(r))
            .take(self.limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostFields;

    fn record(id: &str, likes: u64, retweets: u64, replies: u64) -> PostRecord {
        PostRecord::new(
            PostFields {
                id: id.to_string(),
                likes,
                retweets,
                replies,
                ..Default::default()
            },
            "https://twitter.com",
        )
    }

    #[test]
    fn threshold_is_inclusive() {
        let filter = EngagementFilter::new(155, 10);
        assert!(filter.accepts(&record("a", 120, 30, 5)));
        assert!(!filter.accepts(&record("b", 120, 30, 4)));
    }

    #[test]
    fn same_record_kept_at_100_dropped_at_200() {
        let r = record("a", 120, 30, 5);
        assert_eq!(EngagementFilter::new(100, 10).apply(vec![r.clone()]).len(), 1);
        assert!(EngagementFilter::new(200, 10).apply(vec![r]).is_empty());
    }

    #[test]
    fn order_is_preserved_and_not_resorted() {
        let kept = EngagementFilter::new(10, 10).apply(vec![
            record("low", 10, 0, 0),
            record("skip", 1, 0, 0),
            record("high", 1000, 0, 0),
        ]);
        let ids: Vec<&str> = kept.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["low", "high"]);
    }

    #[test]
    fn stops_pulling_once_limit_is_reached() {
        let mut pulled = 0;
        let source = (0..100).map(|i| {
            pulled += 1;
            record(&i.to_string(), 50, 0, 0)
        });
        let kept = EngagementFilter::new(10, 3).apply(source);
        assert_eq!(kept.len(), 3);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        assert!(EngagementFilter::new(0, 0)
            .apply(vec![record("a", 1, 1, 1)])
            .is_empty());
    }

    #[test]
    fn output_never_exceeds_limit_or_drops_below_threshold() {
        for limit in [0usize, 1, 5, 50] {
            for min in [0u64, 3, 10, 40] {
                let source = (0..30u64).map(|i| record(&i.to_string(), i, i % 3, i % 5));
                let kept = EngagementFilter::new(min, limit).apply(source);
                assert!(kept.len() <= limit);
                assert!(kept.iter().all(|r| r.engagement() >= min));
            }
        }
    }
}
