use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::events::{Observers, PipelineEvents};
use super::worker::run_branch;
use crate::branch::{Branch, BranchTransform};
use crate::domain::{PipelineState, Record, StateCell};
use crate::sink::Destination;

/// State shared between the coordinator handle, its branch workers and
/// the supervisor task
pub(crate) struct Shared {
    pub(crate) state: StateCell,
    pub(crate) shutdown: CancellationToken,
    error: OnceLock<PipelineError>,
    observers: Observers,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: StateCell::new(),
            shutdown: CancellationToken::new(),
            error: OnceLock::new(),
            observers: Observers::new(),
        }
    }

    /// Promote an error to the pipeline's aggregate error
    ///
    /// Only the first call wins; it stops intake, cancels every branch and
    /// then notifies observers. Returns false for swallowed errors.
    pub(crate) fn report(&self, err: PipelineError) -> bool {
        if let Err(swallowed) = self.error.set(err.clone()) {
            debug!(error = %swallowed, "Suppressing error after the first");
            return false;
        }

        warn!(error = %err, "Pipeline error, finalizing all branches");

        // Upstream may already have completed, in which case we stay in Finishing
        if self
            .state
            .transition(PipelineState::Active, PipelineState::Erroring)
        {
            self.state
                .transition(PipelineState::Erroring, PipelineState::Finishing);
        }
        self.shutdown.cancel();

        // Observers must find the pipeline closed. The reporting task is
        // still running here, so the supervisor cannot emit Finished first.
        self.observers.emit_error(err);
        true
    }

    fn error(&self) -> Option<PipelineError> {
        self.error.get().cloned()
    }
}

/// Per-branch accounting returned when the pipeline finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchReport {
    pub branch: usize,
    /// Payloads handed to the transform
    pub processed: u64,
    /// Payloads the transform rejected
    pub failed: u64,
    /// Payloads still queued when the branch was cancelled
    pub dropped: usize,
}

/// Final result of a pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The aggregate error, if any branch failed
    pub error: Option<PipelineError>,
    /// One report per branch, ordered by branch index
    pub branches: Vec<BranchReport>,
}

impl PipelineOutcome {
    /// Check if the pipeline finished without an aggregate error
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Total payloads processed across all branches
    pub fn total_processed(&self) -> u64 {
        self.branches.iter().map(|r| r.processed).sum()
    }
}

/// Builder for a [`FanOut`]
pub struct FanOutBuilder<T, D: ?Sized> {
    destination: Arc<D>,
    config: PipelineConfig,
    _phantom: PhantomData<fn(T)>,
}

impl<T, D> FanOutBuilder<T, D>
where
    T: Send + 'static,
    D: ?Sized + Send + Sync + 'static,
{
    /// Replace the whole configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set number of branches (defaults to 3)
    pub fn with_branches(mut self, num: usize) -> Self {
        self.config = self.config.with_branches(num);
        self
    }

    /// Set per-branch queue capacity (defaults to 64)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_queue_capacity(capacity);
        self
    }

    /// Spawn the branches and the supervisor
    ///
    /// `factory` is called once per branch with the branch index. Must be
    /// called from within a tokio runtime.
    ///
    /// # Example
    /// ```rust,ignore
    /// let sink = Arc::new(CollectingSink::new());
    /// let mut fan_out = FanOut::builder(sink.clone())
    ///     .with_branches(3)
    ///     .build(|_| RejectSentinel::default());
    ///
    /// fan_out.accept(Record::new(0, "ok".to_string())).await?;
    /// let outcome = fan_out.join().await;
    /// ```
    pub fn build<X, F>(self, mut factory: F) -> FanOut<T>
    where
        F: FnMut(usize) -> X,
        X: BranchTransform<T>,
        D: Destination<<X as BranchTransform<T>>::Output>,
    {
        let FanOutBuilder {
            destination,
            config,
            _phantom,
        } = self;

        let shared = Arc::new(Shared::new());
        let mut queues = Vec::with_capacity(config.branches);
        let mut workers = Vec::with_capacity(config.branches);

        for index in 0..config.branches {
            let (tx, rx) = mpsc::channel(config.queue_capacity);
            let branch = Branch::new(index, factory(index));

            workers.push(tokio::spawn(run_branch(
                branch,
                rx,
                Arc::clone(&destination),
                Arc::clone(&shared),
            )));
            queues.push(tx);
        }

        let supervisor = tokio::spawn(supervise::<<X as BranchTransform<T>>::Output, D>(
            workers,
            destination,
            Arc::clone(&shared),
        ));

        debug!(
            branches = config.branches,
            queue_capacity = config.queue_capacity,
            "Fan-out pipeline started"
        );

        FanOut {
            queues: Some(queues),
            shared,
            supervisor,
            branches: config.branches,
        }
    }
}

/// Writable entry point that routes indexed records to parallel branches
///
/// All branches forward into one destination. The first branch failure
/// closes intake, cancels every branch and is reported once to every
/// observer, followed by exactly one `Finished`.
pub struct FanOut<T> {
    queues: Option<Vec<mpsc::Sender<T>>>,
    shared: Arc<Shared>,
    supervisor: JoinHandle<PipelineOutcome>,
    branches: usize,
}

impl<T: Send + 'static> FanOut<T> {
    /// Start building a pipeline that forwards into `destination`
    pub fn builder<D>(destination: Arc<D>) -> FanOutBuilder<T, D>
    where
        D: ?Sized + Send + Sync + 'static,
    {
        FanOutBuilder {
            destination,
            config: PipelineConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Route `record.payload` to the branch at `record.index`
    ///
    /// Waits only for queue capacity, not for the branch to process the
    /// payload. Fails with `Closed` once the pipeline stopped accepting
    /// input and with `Routing` for an index outside the branch set.
    pub async fn accept(&mut self, record: Record<T>) -> Result<(), PipelineError> {
        if !self.shared.state.get().accepts_input() {
            return Err(PipelineError::Closed);
        }

        let Some(queues) = self.queues.as_ref() else {
            return Err(PipelineError::Closed);
        };

        let (index, payload) = record.into_parts();
        let Some(queue) = queues.get(index) else {
            warn!(index, branches = self.branches, "Record routed to unknown branch");
            return Err(PipelineError::Routing {
                index,
                branches: self.branches,
            });
        };

        // Fails only if the branch already stopped after cancellation
        queue
            .send(payload)
            .await
            .map_err(|_| PipelineError::Closed)?;

        Ok(())
    }

    /// Declare that upstream will send no more records
    ///
    /// Every branch drains what is already queued and is then finalized.
    /// Calling this again, or after an error, has no further effect.
    pub fn signal_no_more_input(&mut self) {
        if self.queues.take().is_none() {
            return;
        }

        if self
            .shared
            .state
            .transition(PipelineState::Active, PipelineState::Finishing)
        {
            info!(branches = self.branches, "Upstream complete, finalizing branches");
        }
    }

    /// Register an observer for the aggregate error and `Finished`
    pub fn subscribe(&self) -> PipelineEvents {
        self.shared.observers.subscribe()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.shared.state.get()
    }

    pub fn branch_count(&self) -> usize {
        self.branches
    }

    /// Whether `accept` would currently be refused
    pub fn is_closed(&self) -> bool {
        self.queues.is_none() || !self.state().accepts_input()
    }

    /// The aggregate error recorded so far
    pub fn error(&self) -> Option<PipelineError> {
        self.shared.error()
    }

    /// Wait for the pipeline to reach `Finished`
    ///
    /// Implies [`signal_no_more_input`](Self::signal_no_more_input).
    pub async fn join(mut self) -> PipelineOutcome {
        self.signal_no_more_input();

        match (&mut self.supervisor).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Pipeline supervisor terminated abnormally");
                PipelineOutcome {
                    error: self.shared.error(),
                    branches: Vec::new(),
                }
            }
        }
    }
}

/// Wait for every branch, finalize the destination, then finish
async fn supervise<O, D>(
    workers: Vec<JoinHandle<BranchReport>>,
    destination: Arc<D>,
    shared: Arc<Shared>,
) -> PipelineOutcome
where
    O: Send + 'static,
    D: Destination<O> + ?Sized,
{
    let mut pending: FuturesUnordered<_> = workers
        .into_iter()
        .enumerate()
        .map(|(index, handle)| async move { (index, handle.await) })
        .collect();

    let mut branches = Vec::with_capacity(pending.len());
    while let Some((index, joined)) = pending.next().await {
        match joined {
            Ok(report) => branches.push(report),
            Err(e) => {
                error!(branch = index, error = %e, "Branch task terminated abnormally");
                shared.report(PipelineError::BranchPanicked { branch: index });
                branches.push(BranchReport {
                    branch: index,
                    ..BranchReport::default()
                });
            }
        }
    }
    branches.sort_by_key(|r| r.branch);

    if let Err(e) = Destination::<O>::finish(&*destination).await {
        shared.report(PipelineError::from(e));
    }

    // Dropping the handle without signalling counts as upstream completion
    if shared
        .state
        .transition(PipelineState::Active, PipelineState::Finishing)
    {
        debug!("Coordinator dropped, treating as no more input");
    }

    if !shared
        .state
        .transition(PipelineState::Finishing, PipelineState::Finished)
    {
        warn!(state = %shared.state.get(), "Unexpected state while finishing");
    }

    shared.observers.emit_finished();
    info!(error = shared.error().is_some(), "Pipeline finished");

    PipelineOutcome {
        error: shared.error(),
        branches,
    }
}
