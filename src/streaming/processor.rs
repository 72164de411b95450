use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::error::ErrorPolicy;
use super::reconnect::{NoReconnect, ReconnectPolicy};
use super::reporter::{LogSink, ReportSink, Reporter};
use super::session::{SessionEnd, SessionReport, StreamSession};
use super::state::SessionState;
use crate::engine::RecordProcessor;
use crate::io::{DEFAULT_MAX_OBJECT_BYTES, RecordStream};
use crate::storage::{DEFAULT_TOP_TAGS, TagCount, TweetStatistics};
use crate::transport::Transport;

/// Default period between summaries
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Session reports kept in `ProcessorResults`; older ones only feed the totals
pub const SESSION_HISTORY: usize = 16;

/// Connection and reporting parameters for a processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    pub endpoint: String,
    pub credential: String,
    pub report_interval: Duration,
    pub top_tags: usize,
    pub max_object_bytes: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            credential: String::new(),
            report_interval: DEFAULT_REPORT_INTERVAL,
            top_tags: DEFAULT_TOP_TAGS,
            max_object_bytes: DEFAULT_MAX_OBJECT_BYTES,
        }
    }
}

/// Everything the ingestion task owns
struct Ingestion<S, T, P> {
    statistics: S,
    transport: Arc<T>,
    error_policy: P,
    reconnect: Arc<dyn ReconnectPolicy>,
    settings: StreamSettings,
    shutdown: CancellationToken,
    state: Arc<watch::Sender<SessionState>>,
}

struct Running {
    ingestion: JoinHandle<ProcessorResults>,
    reporter: JoinHandle<()>,
    reporter_stop: CancellationToken,
}

/// Primary API for ingesting a tweet stream.
///
/// Runs two tasks once started: the ingestion loop, the single consumer of the
/// transport and the only writer to the statistics, and the periodic reporter.
/// The statistics stay queryable before, during and after a run.
///
/// # Example
/// ```rust,ignore
/// let statistics = Arc::new(ConcurrentTweetStatistics::new());
/// let mut processor = StreamProcessor::new(statistics, HttpTransport::new(fields)?, SkipErrors)
///     .with_settings(settings)
///     .with_reconnect_policy(FixedBackoff::new(Duration::from_secs(5), 3));
///
/// processor.start();
/// let results = processor.join().await;
/// ```
pub struct StreamProcessor<S, T, P>
where
    S: TweetStatistics + Clone + 'static,
    T: Transport + 'static,
    P: ErrorPolicy + Clone + 'static,
{
    statistics: S,
    transport: Arc<T>,
    error_policy: P,
    settings: StreamSettings,
    reconnect: Arc<dyn ReconnectPolicy>,
    sink: Arc<dyn ReportSink>,
    shutdown: CancellationToken,
    state: Arc<watch::Sender<SessionState>>,
    running: Option<Running>,
    finished: bool,
}

impl<S, T, P> StreamProcessor<S, T, P>
where
    S: TweetStatistics + Clone + 'static,
    T: Transport + 'static,
    P: ErrorPolicy + Clone + 'static,
{
    /// Create a new processor over shared statistics
    ///
    /// # Arguments
    /// * `statistics` - Shared aggregate (typically `Arc<ConcurrentTweetStatistics>`)
    /// * `transport` - Source of the byte stream
    /// * `error_policy` - What to do with skipped records
    pub fn new(statistics: S, transport: T, error_policy: P) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);

        Self {
            statistics,
            transport: Arc::new(transport),
            error_policy,
            settings: StreamSettings::default(),
            reconnect: Arc::new(NoReconnect),
            sink: Arc::new(LogSink),
            shutdown: CancellationToken::new(),
            state: Arc::new(state),
            running: None,
            finished: false,
        }
    }

    pub fn with_settings(mut self, settings: StreamSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the policy consulted after each session (defaults to `NoReconnect`)
    pub fn with_reconnect_policy(mut self, policy: impl ReconnectPolicy + 'static) -> Self {
        self.reconnect = Arc::new(policy);
        self
    }

    /// Set where periodic summaries go (defaults to the log)
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Stop when `token` is cancelled, in addition to `stop()`
    pub fn with_shutdown(mut self, token: &CancellationToken) -> Self {
        self.shutdown = token.child_token();
        self
    }

    /// Spawn the ingestion loop and the periodic reporter.
    ///
    /// Must be called from within a tokio runtime. Calling it again while
    /// running does nothing; a stopped processor cannot be restarted.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        if self.finished || self.shutdown.is_cancelled() {
            warn!("Processor already stopped; not starting");
            return;
        }

        info!(endpoint = %self.settings.endpoint, "Starting stream processor");

        let reporter_stop = self.shutdown.child_token();
        let reporter = Reporter::new(
            self.statistics.clone(),
            self.settings.report_interval,
            self.settings.top_tags,
            self.sink.clone(),
        );
        let reporter = tokio::spawn(reporter.run(reporter_stop.clone()));

        let ingestion = Ingestion {
            statistics: self.statistics.clone(),
            transport: self.transport.clone(),
            error_policy: self.error_policy.clone(),
            reconnect: self.reconnect.clone(),
            settings: self.settings.clone(),
            shutdown: self.shutdown.clone(),
            state: self.state.clone(),
        };
        let ingestion = tokio::spawn(ingestion.run());

        self.running = Some(Running {
            ingestion,
            reporter,
            reporter_stop,
        });
    }

    /// Wait for ingestion to end, then stop the reporter.
    ///
    /// Returns empty results if the processor was never started or was
    /// already joined.
    pub async fn join(&mut self) -> ProcessorResults {
        let Some(running) = self.running.take() else {
            return ProcessorResults::default();
        };
        self.finished = true;

        let results = running.ingestion.await.unwrap_or_else(|e| {
            error!(error = %e, "Ingestion task ended abnormally");
            ProcessorResults::default()
        });

        running.reporter_stop.cancel();
        if let Err(e) = running.reporter.await {
            error!(error = %e, "Reporter task ended abnormally");
        }

        info!(
            sessions = results.total_sessions(),
            records = results.records_counted(),
            "Stream processor finished"
        );
        results
    }

    /// Cancel ingestion and reporting and wait for both to finish.
    ///
    /// Any partially read object is discarded and the transport is released.
    /// The statistics are left intact.
    pub async fn stop(&mut self) -> ProcessorResults {
        self.shutdown.cancel();
        self.finished = true;
        self.join().await
    }

    /// Tweets counted so far
    pub fn total_count(&self) -> u64 {
        self.statistics.total_count()
    }

    /// Current top tags
    pub fn top_tags(&self, k: usize) -> Vec<TagCount> {
        self.statistics.top_tags(k)
    }

    /// State of the current (or last) session
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Observe state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Get reference to the statistics
    pub fn statistics(&self) -> &S {
        &self.statistics
    }
}

impl<S, T, P> Ingestion<S, T, P>
where
    S: TweetStatistics + Clone + 'static,
    T: Transport + 'static,
    P: ErrorPolicy + Clone + 'static,
{
    async fn run(self) -> ProcessorResults {
        let mut results = ProcessorResults::default();
        let mut attempt = 0;

        loop {
            let report = self.run_session().await;
            self.state.send_replace(report.end.terminal_state());

            if report.records_counted > 0 {
                attempt = 0;
            }
            attempt += 1;

            let delay = self.reconnect.next_delay(attempt, &report.end);
            results.record(report);

            let Some(delay) = delay else {
                break;
            };

            info!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting");
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    self.state.send_replace(SessionState::Stopped);
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        results
    }

    async fn run_session(&self) -> SessionReport {
        self.state.send_replace(SessionState::Connecting);
        info!(endpoint = %self.settings.endpoint, "Connecting");

        let connected = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return SessionReport::ended(SessionEnd::Stopped),
            connected = self.transport.connect(&self.settings.endpoint, &self.settings.credential) => connected,
        };

        let body = match connected {
            Ok(body) => body,
            Err(e) => {
                error!(category = %e.category(), error = %e, "Failed to connect");
                return SessionReport::ended(SessionEnd::Failed(e.into()));
            }
        };

        self.state.send_replace(SessionState::Streaming);
        info!("Stream connected");

        let records = RecordStream::with_max_object_bytes(body, self.settings.max_object_bytes);
        let processor = RecordProcessor::new(self.statistics.clone());
        let mut session = StreamSession::new(processor, self.error_policy.clone())
            .with_cancellation(self.shutdown.clone());

        let report = session.process_stream(records).await;

        match &report.end {
            SessionEnd::EndOfStream => info!(records = report.records_counted, "Stream ended"),
            SessionEnd::ApiError(e) => warn!(error = %e, "Server sent an error; stream drained"),
            SessionEnd::Failed(e) => error!(category = e.category(), error = %e, "Stream failed"),
            SessionEnd::Stopped => info!(records = report.records_counted, "Stream stopped"),
        }

        report
    }
}

/// Running totals over every session a processor ran, plus the most recent
/// session reports
#[derive(Debug, Default)]
pub struct ProcessorResults {
    /// Up to `SESSION_HISTORY` reports, oldest first
    pub sessions: VecDeque<SessionReport>,
    total_sessions: usize,
    records_counted: u64,
    records_skipped: u64,
}

impl ProcessorResults {
    fn record(&mut self, report: SessionReport) {
        self.total_sessions += 1;
        self.records_counted += report.records_counted;
        self.records_skipped += report.records_skipped;

        if self.sessions.len() == SESSION_HISTORY {
            self.sessions.pop_front();
        }
        self.sessions.push_back(report);
    }

    pub fn total_sessions(&self) -> usize {
        self.total_sessions
    }

    /// Records counted across all sessions
    pub fn records_counted(&self) -> u64 {
        self.records_counted
    }

    /// Records skipped across all sessions
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    /// How the last session ended
    pub fn last_end(&self) -> Option<&SessionEnd> {
        self.sessions.back().map(|s| &s.end)
    }

    /// Take ownership of how the last session ended
    pub fn into_last_end(mut self) -> Option<SessionEnd> {
        self.sessions.pop_back().map(|s| s.end)
    }
}
