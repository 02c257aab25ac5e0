mod common;

use std::sync::Arc;

use common::{generate_csv_dataset, generate_records};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fanout::prelude::*;
use futures::io::Cursor;
use tokio::runtime::Runtime;

/// Benchmark routing throughput as the branch count grows
fn bench_branch_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out_branch_scaling");
    let runtime = Runtime::new().unwrap();

    let num_records = 10_000;

    for branches in [1usize, 2, 4, 8] {
        let setup = || generate_records(num_records, branches, None);

        let bench = |records: Vec<Record<String>>| async move {
            let sink = Arc::new(CollectingSink::<String>::new());
            let mut fan_out: FanOut<String> = FanOut::builder(Arc::clone(&sink))
                .with_branches(branches)
                .build(|_| RejectSentinel::new(DEFAULT_SENTINEL.to_string()));

            for record in records {
                fan_out.accept(record).await.unwrap();
            }

            black_box(fan_out.join().await);
        };

        group.bench_with_input(BenchmarkId::from_parameter(branches), &branches, |b, _| {
            b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
        });
    }

    group.finish();
}

/// Benchmark how quickly an early failure tears the pipeline down
fn bench_error_shutdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out_error_shutdown");
    let runtime = Runtime::new().unwrap();

    for fail_at in [0usize, 100, 5_000] {
        let setup = || generate_records(10_000, 4, Some(fail_at));

        let bench = |records: Vec<Record<String>>| async move {
            let sink = Arc::new(CollectingSink::<String>::new());
            let mut fan_out: FanOut<String> = FanOut::builder(Arc::clone(&sink))
                .with_branches(4)
                .build(|_| RejectSentinel::new(DEFAULT_SENTINEL.to_string()));

            for record in records {
                if fan_out.accept(record).await.is_err() {
                    break;
                }
            }

            black_box(fan_out.join().await);
        };

        group.bench_with_input(BenchmarkId::from_parameter(fail_at), &fail_at, |b, _| {
            b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
        });
    }

    group.finish();
}

/// Benchmark the full CSV -> fan-out -> writer path
fn bench_end_to_end_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out_end_to_end_csv");
    let runtime = Runtime::new().unwrap();

    let setup = || generate_csv_dataset(10_000, 3);

    let bench = |csv_data: String| async move {
        let records = CsvRecordStream::new(Cursor::new(csv_data.into_bytes()));
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let fan_out = FanOut::builder(sink)
            .with_branches(3)
            .build(|_| RejectSentinel::new(DEFAULT_SENTINEL.to_string()));

        let report = FeedSession::new(fan_out, SilentSkip).run(records).await;
        black_box(report);
    };

    group.bench_function("csv_10k", |b| {
        b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_branch_scaling,
    bench_error_shutdown,
    bench_end_to_end_csv
);
criterion_main!(benches);
