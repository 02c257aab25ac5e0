use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::error::PipelineError;

/// Lifecycle notification delivered to observers
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The aggregate error; sent at most once
    Error(PipelineError),

    /// Terminal notification; always sent exactly once, after any `Error`
    Finished,
}

impl PipelineEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Receiving side of one observer subscription
///
/// The stream ends right after `Finished`.
pub struct PipelineEvents {
    rx: mpsc::UnboundedReceiver<PipelineEvent>,
}

impl PipelineEvents {
    /// Wait for the next event
    pub async fn next(&mut self) -> Option<PipelineEvent> {
        self.rx.recv().await
    }

    /// Wait until the pipeline has finished and return everything observed
    pub async fn collect_all(mut self) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}

impl Stream for PipelineEvents {
    type Item = PipelineEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[derive(Default)]
struct ObserverState {
    senders: Vec<mpsc::UnboundedSender<PipelineEvent>>,
    error: Option<PipelineError>,
    finished: bool,
}

/// Registry of observer channels plus the history needed to replay
/// events to late subscribers
#[derive(Default)]
pub(crate) struct Observers {
    inner: Mutex<ObserverState>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self) -> PipelineEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();

        if let Some(error) = &state.error {
            let _ = tx.send(PipelineEvent::Error(error.clone()));
        }

        if state.finished {
            let _ = tx.send(PipelineEvent::Finished);
        } else {
            state.senders.push(tx);
        }

        PipelineEvents { rx }
    }

    /// Broadcast the aggregate error; ignored if one was already sent
    pub(crate) fn emit_error(&self, error: PipelineError) {
        let mut state = self.lock();
        if state.error.is_some() || state.finished {
            return;
        }

        state
            .senders
            .retain(|tx| tx.send(PipelineEvent::Error(error.clone())).is_ok());
        state.error = Some(error);
    }

    /// Broadcast `Finished` and close every observer channel
    pub(crate) fn emit_finished(&self) {
        let mut state = self.lock();
        if state.finished {
            return;
        }

        state.finished = true;
        for tx in state.senders.drain(..) {
            let _ = tx.send(PipelineEvent::Finished);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ObserverState> {
        // A panicking observer cannot leave the registry half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BranchFailure;

    fn branch_error() -> PipelineError {
        PipelineError::Branch {
            branch: 1,
            failure: BranchFailure::invalid_payload("nope"),
        }
    }

    #[tokio::test]
    async fn error_then_finished() {
        let observers = Observers::new();
        let events = observers.subscribe();

        observers.emit_error(branch_error());
        observers.emit_finished();

        let events = events.collect_all().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PipelineEvent::Error(_)));
        assert!(events[1].is_finished());
    }

    #[tokio::test]
    async fn second_error_is_swallowed() {
        let observers = Observers::new();
        let events = observers.subscribe();

        observers.emit_error(branch_error());
        observers.emit_error(PipelineError::BranchPanicked { branch: 2 });
        observers.emit_finished();
        observers.emit_finished();

        let events = events.collect_all().await;
        assert_eq!(events.len(), 2);
        match &events[0] {
            PipelineEvent::Error(PipelineError::Branch { branch, .. }) => assert_eq!(*branch, 1),
            other => panic!("Expected branch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn late_subscriber_gets_replay() {
        let observers = Observers::new();
        observers.emit_error(branch_error());
        observers.emit_finished();

        let events = observers.subscribe().collect_all().await;
        assert_eq!(events.len(), 2);
        assert!(events[1].is_finished());
    }

    #[tokio::test]
    async fn dropped_observer_does_not_block_others() {
        let observers = Observers::new();
        drop(observers.subscribe());
        let events = observers.subscribe();

        observers.emit_finished();

        let events = events.collect_all().await;
        assert_eq!(events.len(), 1);
    }
}
