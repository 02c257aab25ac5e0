use futures::{Stream, StreamExt};
use tracing::debug;

use super::error::ErrorPolicy;
use crate::domain::Record;
use crate::io::IoError;
use crate::pipeline::{FanOut, PipelineError, PipelineOutcome};

/// Feeds one upstream record stream into a fan-out pipeline
pub struct FeedSession<T, P>
where
    T: Send + 'static,
    P: ErrorPolicy,
{
    fan_out: FanOut<T>,
    error_policy: P,
}

/// Summary of one feed run
#[derive(Debug)]
pub struct FeedReport {
    /// Records handed to a branch
    pub accepted: usize,
    /// Records skipped because they could not be read or routed
    pub rejected: usize,
    /// Whether the error policy stopped the input early
    pub aborted: bool,
    /// How the pipeline itself ended
    pub outcome: PipelineOutcome,
}

impl FeedReport {
    /// True if input was not aborted and no branch failed
    pub fn succeeded(&self) -> bool {
        !self.aborted && self.outcome.succeeded()
    }
}

impl<T, P> FeedSession<T, P>
where
    T: Send + 'static,
    P: ErrorPolicy,
{
    /// Create a new feed session
    pub fn new(fan_out: FanOut<T>, error_policy: P) -> Self {
        Self {
            fan_out,
            error_policy,
        }
    }

    /// Get a reference to the underlying pipeline
    pub fn fan_out(&self) -> &FanOut<T> {
        &self.fan_out
    }

    /// Feed the whole stream, then complete the pipeline and wait for it
    ///
    /// Feeding stops early when the pipeline closes after a branch failure
    /// or when the error policy aborts. Completion is signalled either way.
    pub async fn run<S>(mut self, mut stream: S) -> FeedReport
    where
        S: Stream<Item = Result<Record<T>, IoError>> + Unpin,
    {
        let mut accepted = 0;
        let mut rejected = 0;
        let mut aborted = false;

        while let Some(result) = stream.next().await {
            match result {
                Ok(record) => match self.fan_out.accept(record).await {
                    Ok(()) => accepted += 1,
                    Err(PipelineError::Closed) => {
                        debug!(accepted, "Pipeline closed, stopping input");
                        break;
                    }
                    Err(e) => {
                        rejected += 1;
                        if !self.error_policy.handle_routing_error(e) {
                            aborted = true;
                            break;
                        }
                    }
                },
                Err(e) => {
                    rejected += 1;
                    if !self.error_policy.handle_io_error(e) {
                        aborted = true;
                        break;
                    }
                }
            }
        }

        self.fan_out.signal_no_more_input();
        let outcome = self.fan_out.join().await;

        FeedReport {
            accepted,
            rejected,
            aborted,
            outcome,
        }
    }
}
