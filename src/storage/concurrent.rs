use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::traits::{StatisticsSnapshot, TagCount, TweetStatistics};
use crate::domain::Tweet;

/// In-memory statistics guarded by a single read-write lock.
///
/// Total and tag counters live behind the same lock, so a reader never sees
/// one of them updated for a tweet without the other.
#[derive(Debug, Default)]
pub struct ConcurrentTweetStatistics {
    tally: RwLock<Tally>,
}

#[derive(Debug, Default)]
struct Tally {
    total: u64,
    tags: HashMap<String, TagTally>,
    next_sequence: u64,
}

#[derive(Debug, Clone, Copy)]
struct TagTally {
    count: u64,
    first_seen: u64,
}

impl ConcurrentTweetStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tags seen so far
    pub fn distinct_tags(&self) -> usize {
        self.read().tags.len()
    }

    // A panicking reader cannot leave the tally half-written, so poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, Tally> {
        self.tally.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tally> {
        self.tally.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Tally {
    fn record(&mut self, tweet: &Tweet) {
        self.total += 1;

        for tag in tweet.hashtags() {
            if let Some(existing) = self.tags.get_mut(tag.as_str()) {
                existing.count += 1;
                continue;
            }
            self.tags.insert(
                tag.clone(),
                TagTally {
                    count: 1,
                    first_seen: self.next_sequence,
                },
            );
            self.next_sequence += 1;
        }
    }

    fn ranked(&self, k: usize) -> Vec<TagCount> {
        if k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(&String, &TagTally)> = self.tags.iter().collect();
        let by_rank = |a: &(&String, &TagTally), b: &(&String, &TagTally)| -> Ordering {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        };

        if ranked.len() > k {
            ranked.select_nth_unstable_by(k - 1, by_rank);
            ranked.truncate(k);
        }
        ranked.sort_unstable_by(by_rank);

        ranked
            .into_iter()
            .map(|(tag, tally)| TagCount::new(tag.as_str(), tally.count))
            .collect()
    }
}

impl TweetStatistics for ConcurrentTweetStatistics {
    fn report(&self, tweet: &Tweet) {
        self.write().record(tweet);
    }

    fn total_count(&self) -> u64 {
        self.read().total
    }

    fn top_tags(&self, k: usize) -> Vec<TagCount> {
        self.read().ranked(k)
    }

    fn snapshot(&self, k: usize) -> StatisticsSnapshot {
        let tally = self.read();
        StatisticsSnapshot {
            total: tally.total,
            limit: k,
            top_tags: tally.ranked(k),
        }
    }
}
