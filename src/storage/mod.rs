pub mod concurrent;
pub mod traits;

// Re-export commonly used types
pub use concurrent::ConcurrentTweetStatistics;
pub use traits::{DEFAULT_TOP_TAGS, StatisticsSnapshot, TagCount, TweetStatistics};
