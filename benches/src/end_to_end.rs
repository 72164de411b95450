mod common;

use std::sync::Arc;

use common::generate_stream;
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use futures::io::Cursor;
use tagstream::prelude::*;
use tokio::runtime::Runtime;

/// Benchmark a full session: extraction, classification, counting and summary
fn bench_session_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_pipeline");
    let runtime = Runtime::new().unwrap();

    for (size_name, num_tweets) in [("small_1k", 1_000), ("medium_10k", 10_000), ("large_100k", 100_000)] {
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &num_tweets, |b, &num_tweets| {
            b.to_async(&runtime).iter_batched(
                || generate_stream(num_tweets, 500, 2),
                |body| async move {
                    let records = RecordStream::new(Cursor::new(body.into_bytes()));
                    let processor = RecordProcessor::new(ConcurrentTweetStatistics::new());
                    let mut session = StreamSession::new(processor, SilentSkip);
                    black_box(session.process_stream(records).await);

                    let mut output = Vec::new();
                    write_summary(&session.statistics().snapshot(DEFAULT_TOP_TAGS), &mut output)
                        .await
                        .unwrap();
                    black_box(output);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the processor over a scripted transport, reporter included
fn bench_processor_scripted(c: &mut Criterion) {
    let mut group = c.benchmark_group("processor_scripted");
    let runtime = Runtime::new().unwrap();

    for chunk_size in [512, 8_192] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &chunk_size| {
            b.to_async(&runtime).iter_batched(
                || {
                    let body = generate_stream(10_000, 500, 2);
                    let chunks = body.as_bytes().chunks(chunk_size).map(|c| c.to_vec()).collect();
                    ScriptedTransport::new([ScriptedConnection::Accept {
                        chunks,
                        hold_open: false,
                    }])
                },
                |transport| async move {
                    let statistics = Arc::new(ConcurrentTweetStatistics::new());
                    let mut processor = StreamProcessor::new(statistics.clone(), transport, SilentSkip)
                        .with_sink(|_: &StatisticsSnapshot| {});
                    processor.start();
                    black_box(processor.join().await);
                    black_box(statistics.total_count())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_session_pipeline, bench_processor_scripted);
criterion_main!(benches);
