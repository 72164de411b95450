use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::storage::{StatisticsSnapshot, TweetStatistics};

/// Shortest interval the reporter will tick at
const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(10);

/// Receives periodic summaries
pub trait ReportSink: Send + Sync {
    fn emit(&self, snapshot: &StatisticsSnapshot);
}

/// Writes summaries to the log at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&self, snapshot: &StatisticsSnapshot) {
        info!("Total Tweets Received: {}", snapshot.total);
        info!("Top {} HashTags", snapshot.limit);
        for entry in &snapshot.top_tags {
            info!("{}: {}", entry.tag, entry.count);
        }
    }
}

impl<F> ReportSink for F
where
    F: Fn(&StatisticsSnapshot) + Send + Sync,
{
    fn emit(&self, snapshot: &StatisticsSnapshot) {
        self(snapshot)
    }
}

/// Periodic reporter reading the aggregate on a fixed interval.
///
/// Each tick takes one snapshot under the statistics' read guard; ingestion is
/// never awaited.
pub struct Reporter<S>
where
    S: TweetStatistics,
{
    statistics: S,
    interval: Duration,
    top_tags: usize,
    sink: Arc<dyn ReportSink>,
}

impl<S> Reporter<S>
where
    S: TweetStatistics,
{
    pub fn new(statistics: S, interval: Duration, top_tags: usize, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            statistics,
            interval: interval.max(MIN_REPORT_INTERVAL),
            top_tags,
            sink,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Emit one summary immediately
    pub fn report_now(&self) {
        let snapshot = self.statistics.snapshot(self.top_tags);
        self.sink.emit(&snapshot);
    }

    /// Emit a summary every interval until `stop` is cancelled.
    ///
    /// The first summary is emitted one interval after the call.
    pub async fn run(self, stop: CancellationToken) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = ticker.tick() => self.report_now(),
            }
        }
    }
}
