use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::io::Cursor;
use tagstream::prelude::*;

/// Helper to ingest a captured body and return the written summary
async fn process_body(input: &str) -> (SessionReport, String) {
    let reader = Cursor::new(input.to_string().into_bytes());
    let records = RecordStream::new(reader);

    let statistics = ConcurrentTweetStatistics::new();
    let processor = RecordProcessor::new(statistics);
    let mut session = StreamSession::new(processor, SilentSkip);

    let report = session.process_stream(records).await;

    let mut output = Vec::new();
    write_summary(&session.statistics().snapshot(DEFAULT_TOP_TAGS), &mut output)
        .await
        .expect("Failed to write summary");

    (report, String::from_utf8(output).expect("Invalid UTF-8 in output"))
}

fn settings() -> StreamSettings {
    StreamSettings {
        endpoint: "https://stream.test/2/tweets/sample/stream".to_string(),
        credential: "token".to_string(),
        ..StreamSettings::default()
    }
}

fn processor_over(
    script: Vec<ScriptedConnection>,
) -> (
    Arc<ConcurrentTweetStatistics>,
    StreamProcessor<Arc<ConcurrentTweetStatistics>, ScriptedTransport, SilentSkip>,
) {
    let statistics = Arc::new(ConcurrentTweetStatistics::new());
    let processor = StreamProcessor::new(statistics.clone(), ScriptedTransport::new(script), SilentSkip)
        .with_settings(settings());
    (statistics, processor)
}

#[tokio::test]
async fn counts_tweets_and_ranks_hashtags() {
    let input = concat!(
        r#"{"entities":{"hashtags":[{"text":"go"}]}}"#,
        "\r\n",
        r#"{"entities":{"hashtags":[{"text":"go"},{"text":"rust"}]}}"#,
        "\r\n",
        "{}\r\n",
    );

    let (report, output) = process_body(input).await;

    assert_eq!(report.records_counted, 3);
    assert!(matches!(report.end, SessionEnd::EndOfStream));
    assert_eq!(
        output,
        "Total Tweets Received: 3\nTop 10 HashTags\ngo: 2\nrust: 1\n"
    );
}

#[tokio::test]
async fn skips_unusable_tag_entries_and_malformed_records() {
    let input = concat!(
        r#"{"entities":{"hashtags":[{"text":"go"},5,{"indices":[0,3]},{"text":""}]}}"#,
        r#"{"entities":{"hashtags":"go"}}"#,
        r#"{"entities":{"hashtags":[{"text":"go"}], "urls": [{"url":"}"}]}}"#,
        r#"{"id": }"#,
        r#"{"data":{"id":"7","entities":{"hashtags":[{"start":0,"end":5,"tag":"rust"}]}}}"#,
    );

    let (report, output) = process_body(input).await;

    assert_eq!(report.records_counted, 3);
    assert_eq!(report.records_skipped, 2);
    assert_eq!(
        output,
        "Total Tweets Received: 3\nTop 10 HashTags\ngo: 2\nrust: 1\n"
    );
}

#[tokio::test]
async fn stream_ending_mid_object_drops_partial_object() {
    let input = r#"{"entities":{"hashtags":[{"text":"go"}]}} {"entities":{"hashtags":[{"te"#;

    let (report, output) = process_body(input).await;

    assert_eq!(report.records_counted, 1);
    assert!(matches!(report.end, SessionEnd::EndOfStream));
    assert_eq!(output, "Total Tweets Received: 1\nTop 10 HashTags\ngo: 1\n");
}

#[tokio::test]
async fn server_error_ends_session_after_counted_records() {
    let body = concat!(
        r#"{"entities":{"hashtags":[{"text":"go"}]}}"#,
        r#"{"entities":{"hashtags":[{"text":"rust"}]}}"#,
        r#"{"title":"ConnectionException","detail":"closed"}"#,
        r#"{"entities":{"hashtags":[{"text":"never"}]}}"#,
    );
    let (statistics, mut processor) = processor_over(vec![ScriptedConnection::open_ended(body)]);

    processor.start();
    let results = processor.join().await;

    match results.last_end() {
        Some(SessionEnd::ApiError(error)) => {
            assert_eq!(error.title, "ConnectionException");
            assert_eq!(error.detail, "closed");
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
    assert_eq!(processor.state(), SessionState::Draining);
    assert_eq!(statistics.total_count(), 2);
    assert_eq!(
        statistics.top_tags(10),
        vec![TagCount::new("go", 1), TagCount::new("rust", 1)]
    );
}

#[tokio::test]
async fn errors_envelope_is_never_counted() {
    let body = r#"{"errors":[{"title":"Invalid Request","detail":"bad query"}]}"#;
    let (statistics, mut processor) = processor_over(vec![ScriptedConnection::body(body)]);

    processor.start();
    let results = processor.join().await;

    assert!(matches!(results.last_end(), Some(SessionEnd::ApiError(_))));
    assert_eq!(statistics.total_count(), 0);
}

#[tokio::test]
async fn connect_failures_are_categorized() {
    for (rejection, category) in [
        (TransportError::Unauthorized, "unauthorized"),
        (TransportError::RateLimited, "rate-limited"),
        (
            TransportError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            },
            "other",
        ),
    ] {
        let (statistics, mut processor) =
            processor_over(vec![ScriptedConnection::Reject(rejection)]);

        processor.start();
        let results = processor.join().await;

        match results.last_end() {
            Some(SessionEnd::Failed(error)) => assert_eq!(error.category(), category),
            other => panic!("Expected Failed, got {other:?}"),
        }
        assert_eq!(processor.state(), SessionState::Failed);
        assert_eq!(statistics.total_count(), 0);
    }
}

#[tokio::test]
async fn objects_split_across_chunks_are_reassembled() {
    let body = r#"{"entities":{"hashtags":[{"text":"go"},{"text":"rust"}]}}{"entities":{"hashtags":[{"text":"go"}]}}"#;
    let chunks = body
        .as_bytes()
        .chunks(7)
        .map(|chunk| chunk.to_vec())
        .collect();
    let (statistics, mut processor) = processor_over(vec![ScriptedConnection::Accept {
        chunks,
        hold_open: false,
    }]);

    processor.start();
    processor.join().await;

    assert_eq!(statistics.total_count(), 2);
    assert_eq!(
        statistics.top_tags(10),
        vec![TagCount::new("go", 2), TagCount::new("rust", 1)]
    );
}

#[tokio::test]
async fn oversized_object_fails_session() {
    let body = format!(r#"{{"text":"{}"}}"#, "x".repeat(256));
    let statistics = Arc::new(ConcurrentTweetStatistics::new());
    let mut processor = StreamProcessor::new(
        statistics.clone(),
        ScriptedTransport::new([ScriptedConnection::body(body)]),
        SilentSkip,
    )
    .with_settings(StreamSettings {
        max_object_bytes: 64,
        ..settings()
    });

    processor.start();
    let results = processor.join().await;

    assert!(matches!(
        results.last_end(),
        Some(SessionEnd::Failed(SessionError::Extraction(IoError::ObjectTooLarge { limit: 64 })))
    ));
    assert_eq!(statistics.total_count(), 0);
}

#[tokio::test]
async fn stop_leaves_statistics_queryable() {
    let (statistics, mut processor) = processor_over(vec![ScriptedConnection::open_ended(
        r#"{"entities":{"hashtags":[{"text":"go"}]}}{"entities":"#,
    )]);
    let mut state = processor.subscribe_state();

    processor.start();
    state
        .wait_for(|s| *s == SessionState::Streaming)
        .await
        .unwrap();
    while statistics.total_count() < 1 {
        tokio::task::yield_now().await;
    }

    let results = processor.stop().await;

    assert!(matches!(results.last_end(), Some(SessionEnd::Stopped)));
    assert_eq!(processor.total_count(), 1);
    assert_eq!(processor.top_tags(10), vec![TagCount::new("go", 1)]);
}

#[tokio::test(start_paused = true)]
async fn fixed_backoff_reconnects_after_drained_session() {
    let transport = Arc::new(ScriptedTransport::new([
        ScriptedConnection::body(r#"{"entities":{"hashtags":[{"text":"go"}]}}"#),
        ScriptedConnection::Reject(TransportError::RateLimited),
        ScriptedConnection::body(r#"{"entities":{"hashtags":[{"text":"rust"}]}}"#),
    ]));
    let statistics = Arc::new(ConcurrentTweetStatistics::new());

    let mut processor = StreamProcessor::new(statistics.clone(), transport.clone(), SilentSkip)
        .with_settings(settings())
        .with_reconnect_policy(FixedBackoff::new(Duration::from_secs(5), 2));
    processor.start();
    let results = processor.join().await;

    // Two productive sessions, one rejection, then the exhausted script fails
    // until the attempt limit is hit.
    assert_eq!(results.records_counted(), 2);
    assert!(matches!(results.last_end(), Some(SessionEnd::Failed(_))));
    assert_eq!(transport.attempts(), 5);
    assert_eq!(statistics.total_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn reporter_emits_snapshots_while_streaming() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = seen.clone();

    let statistics = Arc::new(ConcurrentTweetStatistics::new());
    let mut processor = StreamProcessor::new(
        statistics.clone(),
        ScriptedTransport::new([ScriptedConnection::open_ended(
            r#"{"entities":{"hashtags":[{"text":"go"}]}}{"entities":{"hashtags":[{"text":"go"}]}}"#,
        )]),
        SilentSkip,
    )
    .with_settings(StreamSettings {
        report_interval: Duration::from_secs(1),
        ..settings()
    })
    .with_sink(move |snapshot: &StatisticsSnapshot| {
        sink_seen.lock().unwrap().push(snapshot.clone());
    });

    processor.start();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    processor.stop().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for snapshot in seen.iter() {
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.limit, DEFAULT_TOP_TAGS);
        assert_eq!(snapshot.top_tags, vec![TagCount::new("go", 2)]);
    }
}

#[tokio::test]
async fn replays_captured_stream_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("capture.jsonl");
    std::fs::write(
        &capture,
        "{\"data\":{\"entities\":{\"hashtags\":[{\"tag\":\"rust\"}]}}}\n{\"data\":{\"text\":\"no tags\"}}\n",
    )
    .unwrap();

    let statistics = Arc::new(ConcurrentTweetStatistics::new());
    let mut processor = StreamProcessor::new(statistics.clone(), ReplayTransport::new(&capture), SilentSkip)
        .with_settings(StreamSettings {
            endpoint: capture.display().to_string(),
            ..StreamSettings::default()
        });

    processor.start();
    let results = processor.join().await;

    assert!(matches!(results.last_end(), Some(SessionEnd::EndOfStream)));
    assert_eq!(statistics.total_count(), 2);
    assert_eq!(statistics.top_tags(10), vec![TagCount::new("rust", 1)]);
}

/// Statistics double recording every reported tweet
#[derive(Default)]
struct RecordingStatistics {
    reported: Mutex<Vec<Tweet>>,
}

impl TweetStatistics for RecordingStatistics {
    fn report(&self, tweet: &Tweet) {
        self.reported.lock().unwrap().push(tweet.clone());
    }

    fn total_count(&self) -> u64 {
        self.reported.lock().unwrap().len() as u64
    }

    fn top_tags(&self, _k: usize) -> Vec<TagCount> {
        Vec::new()
    }
}

#[tokio::test]
async fn processor_reports_each_data_record_once() {
    let statistics = Arc::new(RecordingStatistics::default());
    let body = concat!(
        r#"{"id":"1","entities":{"hashtags":[{"text":"go"}]}}"#,
        r#"{"id":"2"}"#,
        r#"{"title":"Weekly digest","entities":{"hashtags":[{"text":"news"}]}}"#,
    );
    let mut processor = StreamProcessor::new(
        statistics.clone(),
        ScriptedTransport::new([ScriptedConnection::body(body)]),
        SilentSkip,
    )
    .with_settings(settings());

    processor.start();
    processor.join().await;

    let reported = statistics.reported.lock().unwrap();
    let ids: Vec<Option<&str>> = reported.iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![Some("1"), Some("2"), None]);
    assert_eq!(reported[0].hashtags(), ["go".to_string()]);
    assert!(reported[1].hashtags().is_empty());
    assert_eq!(reported[2].hashtags(), ["news".to_string()]);
}
