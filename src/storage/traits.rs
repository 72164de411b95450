use std::sync::Arc;

use crate::domain::Tweet;

/// Number of tags reported when no explicit limit is given
pub const DEFAULT_TOP_TAGS: usize = 10;

/// One entry of a top-K listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Point-in-time view of the aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Records reported so far
    pub total: u64,
    /// Limit the listing was requested with
    pub limit: usize,
    /// Highest-count tags, count descending
    pub top_tags: Vec<TagCount>,
}

/// Running statistics over accepted tweets.
///
/// Writers are serialized by contract (one ingestion loop); readers may call
/// any query concurrently with a `report`.
pub trait TweetStatistics: Send + Sync {
    /// Count one tweet and each of its hashtags
    fn report(&self, tweet: &Tweet);

    /// Tweets reported so far
    fn total_count(&self) -> u64;

    /// Up to `k` tags ordered by count descending, ties in first-seen order
    fn top_tags(&self, k: usize) -> Vec<TagCount>;

    /// Total and top tags together.
    ///
    /// Implementations that can take both under one guard should override this.
    fn snapshot(&self, k: usize) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total: self.total_count(),
            limit: k,
            top_tags: self.top_tags(k),
        }
    }
}

// Shared handles report into the same aggregate
impl<S: TweetStatistics + ?Sized> TweetStatistics for Arc<S> {
    fn report(&self, tweet: &Tweet) {
        (**self).report(tweet)
    }

    fn total_count(&self) -> u64 {
        (**self).total_count()
    }

    fn top_tags(&self, k: usize) -> Vec<TagCount> {
        (**self).top_tags(k)
    }

    fn snapshot(&self, k: usize) -> StatisticsSnapshot {
        (**self).snapshot(k)
    }
}
