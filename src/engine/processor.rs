use tracing::debug;

use super::classifier::classify;
use super::error::EngineError;
use crate::domain::{ApiError, ClassifiedOutcome, RawRecord};
use crate::storage::TweetStatistics;

/// What happened to a record that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDisposition {
    /// Reported to the statistics
    Counted { hashtags: usize },

    /// Server-sent error; the session must end
    Terminate(ApiError),
}

/// Record processor routing classified records into the statistics
pub struct RecordProcessor<S>
where
    S: TweetStatistics,
{
    statistics: S,
}

impl<S> RecordProcessor<S>
where
    S: TweetStatistics,
{
    /// Create a new record processor
    pub fn new(statistics: S) -> Self {
        Self { statistics }
    }

    /// Process a single record.
    ///
    /// Malformed records are returned as errors and leave the statistics
    /// untouched.
    pub fn process_record(&mut self, record: RawRecord) -> Result<RecordDisposition, EngineError> {
        match classify(&record) {
            ClassifiedOutcome::Data(tweet) => {
                debug!(id = tweet.id(), "Processing tweet");
                for hashtag in tweet.hashtags() {
                    debug!(%hashtag, "Hashtag extracted");
                }

                self.statistics.report(&tweet);
                Ok(RecordDisposition::Counted {
                    hashtags: tweet.hashtags().len(),
                })
            }
            ClassifiedOutcome::ApiError(error) => Ok(RecordDisposition::Terminate(error)),
            ClassifiedOutcome::Malformed(reason) => Err(EngineError::MalformedRecord(reason)),
        }
    }

    /// Get reference to the statistics for snapshot queries
    pub fn statistics(&self) -> &S {
        &self.statistics
    }
}
