mod common;

use common::generate_stream;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use futures::StreamExt;
use futures::io::Cursor;
use tagstream::prelude::*;
use tokio::runtime::Runtime;

/// Benchmark object demarcation over a whole body fed at once
fn bench_scanner_single_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_single_chunk");

    for num_tweets in [100, 1_000, 10_000] {
        let body = generate_stream(num_tweets, 50, 3);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_tweets), &body, |b, body| {
            b.iter(|| {
                let mut scanner = ObjectScanner::new();
                scanner.feed(body.as_bytes());
                let mut objects = 0;
                while let Some(result) = scanner.next_object() {
                    black_box(result.unwrap());
                    objects += 1;
                }
                black_box(objects)
            });
        });
    }

    group.finish();
}

/// Benchmark demarcation when the body arrives in small chunks
fn bench_scanner_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_chunk_sizes");
    let body = generate_stream(1_000, 50, 3);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [16, 256, 4_096] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &chunk_size| {
            b.iter(|| {
                let mut scanner = ObjectScanner::new();
                let mut objects = 0;
                for chunk in body.as_bytes().chunks(chunk_size) {
                    scanner.feed(chunk);
                    while let Some(result) = scanner.next_object() {
                        black_box(result.unwrap());
                        objects += 1;
                    }
                }
                black_box(objects)
            });
        });
    }

    group.finish();
}

/// Benchmark the async record stream over an in-memory reader
fn bench_record_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_stream");
    let runtime = Runtime::new().unwrap();

    for num_tweets in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(num_tweets), &num_tweets, |b, &num_tweets| {
            b.to_async(&runtime).iter_batched(
                || generate_stream(num_tweets, 50, 3),
                |body| async move {
                    let records = RecordStream::new(Cursor::new(body.into_bytes()));
                    black_box(records.count().await)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scanner_single_chunk,
    bench_scanner_chunk_sizes,
    bench_record_stream
);
criterion_main!(benches);
