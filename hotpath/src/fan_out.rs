use fanout::prelude::*;
use std::sync::Arc;
use tokio::runtime::Builder;

/// Fan-out hotpath profiling
///
/// Profiles routing, branch processing and destination writes on a
/// multi-threaded runtime, then a run that fails part-way through.
///
/// Run with: cargo run --release --bin hotpath_fan_out --features profiling
#[hotpath::main]
fn main() {
    println!("=== Fan-Out Hotpath Profile ===");
    println!("Workload: 1M records across 8 branches, then a failing run");
    println!();

    let runtime = Builder::new_multi_thread()
        .worker_threads(8)
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        run_clean_workload(1_000_000, 8).await;
        run_failing_workload(1_000_000, 8, 250_000).await;
    });

    println!();
    println!("Profiling complete. Results above show function-level breakdown.");
}

#[hotpath::measure]
async fn run_clean_workload(num_records: usize, branches: usize) {
    let sink = Arc::new(CollectingSink::<String>::new());
    let mut fan_out = build_pipeline(&sink, branches);

    for i in 0..num_records {
        route_record(&mut fan_out, i % branches, format!("payload-{}", i)).await;
    }

    let outcome = fan_out.join().await;
    println!(
        "Clean run: {} records processed, {} collected",
        outcome.total_processed(),
        sink.len()
    );
}

#[hotpath::measure]
async fn run_failing_workload(num_records: usize, branches: usize, fail_at: usize) {
    let sink = Arc::new(CollectingSink::<String>::new());
    let mut fan_out = build_pipeline(&sink, branches);

    for i in 0..num_records {
        let payload = if i == fail_at {
            DEFAULT_SENTINEL.to_string()
        } else {
            format!("payload-{}", i)
        };

        if fan_out.is_closed() {
            break;
        }
        route_record(&mut fan_out, i % branches, payload).await;
    }

    let outcome = fan_out.join().await;
    let dropped: usize = outcome.branches.iter().map(|r| r.dropped).sum();
    println!(
        "Failing run: {} processed, {} dropped, error: {:?}",
        outcome.total_processed(),
        dropped,
        outcome.error.map(|e| e.to_string())
    );
}

fn build_pipeline(sink: &Arc<CollectingSink<String>>, branches: usize) -> FanOut<String> {
    FanOut::builder(Arc::clone(sink))
        .with_branches(branches)
        .with_queue_capacity(1024)
        .build(|_| RejectSentinel::new(DEFAULT_SENTINEL.to_string()))
}

#[hotpath::measure]
async fn route_record(fan_out: &mut FanOut<String>, index: usize, payload: String) {
    let _ = fan_out.accept(Record::new(index, payload)).await;
}
