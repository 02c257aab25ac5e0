use std::sync::Arc;

use fanout::prelude::*;
use tracing::info;

/// Parsed command line
struct Args {
    input_file: String,
    config: PipelineConfig,
}

fn main() {
    CliApp::new("fanout")
        .with_args(parse_args)
        .run(run_pipeline);
}

/// Parse and validate command-line arguments
fn parse_args(args: Vec<String>) -> Result<Args, AppError> {
    if !(2..=3).contains(&args.len()) {
        return Err(AppError::InvalidArguments(
            "Usage: fanout <records.csv> [branches]".to_string(),
        ));
    }

    let mut config = PipelineConfig::default();
    if let Some(raw) = args.get(2) {
        let branches = raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| AppError::InvalidArguments(format!("Invalid branch count: {}", raw)))?;
        config = config.with_branches(branches);
    }

    Ok(Args {
        input_file: args[1].clone(),
        config,
    })
}

/// Main application logic - routes CSV records through the branches to stdout
async fn run_pipeline(writers: Writers, args: Args) -> Result<(), AppError> {
    let records = CsvRecordStream::from_file(&args.input_file).await?;

    // Every branch writes its lines into the same stdout sink
    let sink = Arc::new(WriterSink::new(writers.stdout));
    let fan_out = FanOut::builder(sink)
        .with_config(args.config)
        .build(|_| RejectSentinel::new(DEFAULT_SENTINEL.to_string()));

    let report = FeedSession::new(fan_out, SkipErrors).run(records).await;

    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        processed = report.outcome.total_processed(),
        "Input complete"
    );

    if let Some(err) = report.outcome.error {
        return Err(err.into());
    }

    if report.aborted {
        return Err(AppError::InputAborted(report.accepted));
    }

    Ok(())
}
