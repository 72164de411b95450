mod common;

use std::sync::Arc;
use std::thread;

use common::{create_tweets, populated_statistics};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tagstream::prelude::*;

/// Benchmark report throughput with varying tag cardinality
fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    for distinct_tags in [10, 1_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(distinct_tags),
            &distinct_tags,
            |b, &distinct_tags| {
                b.iter_batched(
                    || (ConcurrentTweetStatistics::new(), create_tweets(10_000, distinct_tags)),
                    |(statistics, tweets)| {
                        for tweet in &tweets {
                            statistics.report(tweet);
                        }
                        black_box(statistics.total_count())
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark top-k selection over a populated aggregate
fn bench_top_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_tags");

    for distinct_tags in [100, 10_000, 100_000] {
        let statistics = populated_statistics(200_000, distinct_tags);
        group.bench_with_input(
            BenchmarkId::from_parameter(distinct_tags),
            &statistics,
            |b, statistics| {
                b.iter(|| black_box(statistics.top_tags(DEFAULT_TOP_TAGS)));
            },
        );
    }

    group.finish();
}

/// Benchmark reporting while reader threads take snapshots
fn bench_report_with_readers(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_with_readers");

    for readers in [0, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(readers), &readers, |b, &readers| {
            b.iter_batched(
                || (Arc::new(ConcurrentTweetStatistics::new()), create_tweets(10_000, 1_000)),
                |(statistics, tweets)| {
                    thread::scope(|scope| {
                        for _ in 0..readers {
                            let statistics = Arc::clone(&statistics);
                            scope.spawn(move || {
                                for _ in 0..100 {
                                    black_box(statistics.snapshot(DEFAULT_TOP_TAGS));
                                }
                            });
                        }

                        for tweet in &tweets {
                            statistics.report(tweet);
                        }
                    });
                    black_box(statistics.total_count())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_report, bench_top_tags, bench_report_with_readers);
criterion_main!(benches);
