//! Example: Scripted Stream With Reconnects
//!
//! This example runs the full processor against an in-memory transport that
//! plays back a small script: a stream that is cut mid-object, a rate-limited
//! connect, a stream that ends with a server error, and finally an exhausted
//! script. A fixed backoff policy reconnects between sessions and the reporter
//! prints a summary every second.
//!
//! Usage:
//!   cargo run --example scripted_stream
//!
//! Set RUST_LOG=debug to see each extracted hashtag.

use std::sync::Arc;
use std::time::Duration;

use tagstream::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tagstream::logging::init(None)?;

    let first = concat!(
        r#"{"data":{"id":"1","entities":{"hashtags":[{"tag":"rust"},{"tag":"tokio"}]}}}"#,
        "\r\n",
        r#"{"data":{"id":"2","entities":{"hashtags":[{"tag":"rust"}]}}}"#,
        "\r\n",
        r#"{"data":{"id":"3","entities":{"hashtags":[{"tag":"ser"#,
    );
    let second = concat!(
        r#"{"data":{"id":"4","text":"no tags here"}}"#,
        "\r\n",
        r#"{"data":{"id":"5","entities":{"hashtags":[{"tag":"serde"},{"tag":"rust"}]}}}"#,
        "\r\n",
        r#"{"errors":[{"title":"ConnectionException","detail":"This stream has been disconnected."}]}"#,
    );

    let transport = ScriptedTransport::new([
        ScriptedConnection::body(first),
        ScriptedConnection::Reject(TransportError::RateLimited),
        ScriptedConnection::body(second),
    ]);

    let statistics = Arc::new(ConcurrentTweetStatistics::new());
    let mut processor = StreamProcessor::new(statistics.clone(), transport, SkipErrors)
        .with_settings(StreamSettings {
            endpoint: "scripted://sample".to_string(),
            report_interval: Duration::from_secs(1),
            top_tags: 3,
            ..StreamSettings::default()
        })
        .with_reconnect_policy(FixedBackoff::new(Duration::from_millis(500), 2));

    eprintln!("=== Scripted Stream Example ===");
    processor.start();
    let results = processor.join().await;

    eprintln!();
    eprintln!("=== Sessions ===");
    for (i, session) in results.sessions.iter().enumerate() {
        eprintln!(
            "  {}. counted {}, skipped {}, ended {:?}",
            i + 1,
            session.records_counted,
            session.records_skipped,
            session.end
        );
    }

    let mut stdout = tokio::io::stdout();
    write_summary(&statistics.snapshot(3), &mut stdout).await?;

    Ok(())
}
