use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::coordinator::{BranchReport, Shared};
use super::error::PipelineError;
use crate::branch::{Branch, BranchTransform};
use crate::sink::Destination;

/// Drive one branch until its queue closes or the pipeline is cancelled
///
/// Outputs are forwarded as soon as they are produced. Failures are
/// reported and the loop keeps going; only the coordinator ends a branch.
pub(crate) async fn run_branch<T, X, D>(
    mut branch: Branch<X>,
    mut queue: mpsc::Receiver<T>,
    destination: Arc<D>,
    shared: Arc<Shared>,
) -> BranchReport
where
    T: Send + 'static,
    X: BranchTransform<T>,
    D: Destination<<X as BranchTransform<T>>::Output> + ?Sized,
{
    let index = branch.index();

    loop {
        // Cancellation wins over queued input so nothing is processed after finalize
        let payload = tokio::select! {
            biased;
            _ = shared.shutdown.cancelled() => break,
            next = queue.recv() => match next {
                Some(payload) => payload,
                None => break,
            },
        };

        match branch.process(payload) {
            Ok(output) => {
                if let Err(e) = destination.send(index, output).await {
                    shared.report(PipelineError::from(e));
                }
            }
            Err(failure) => {
                debug!(
                    branch = index,
                    kind = %failure.kind,
                    cause = %failure.cause,
                    "Branch transform failed"
                );
                shared.report(PipelineError::Branch {
                    branch: index,
                    failure,
                });
            }
        }
    }

    // Refuse further sends, then count what was left behind
    queue.close();
    let mut dropped = 0;
    while queue.try_recv().is_ok() {
        dropped += 1;
    }

    if dropped > 0 {
        debug!(branch = index, dropped, "Discarded queued payloads on cancel");
    }

    branch.finalize();

    BranchReport {
        branch: index,
        processed: branch.processed(),
        failed: branch.failed(),
        dropped,
    }
}
