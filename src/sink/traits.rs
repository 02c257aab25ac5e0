use std::sync::Arc;

use async_trait::async_trait;

use super::error::SinkError;

/// Shared destination that every branch forwards its outputs into
///
/// Implementations must accept items from several branches at once and
/// serialize the writes themselves; the coordinator does no locking of
/// its own. `branch` identifies the producing lane.
#[async_trait]
pub trait Destination<T: Send + 'static>: Send + Sync {
    /// Accept one item produced by `branch`
    async fn send(&self, branch: usize, item: T) -> Result<(), SinkError>;

    /// No more input will arrive from any branch
    async fn finish(&self) -> Result<(), SinkError>;
}

#[async_trait]
impl<T, D> Destination<T> for Arc<D>
where
    T: Send + 'static,
    D: Destination<T> + ?Sized,
{
    async fn send(&self, branch: usize, item: T) -> Result<(), SinkError> {
        (**self).send(branch, item).await
    }

    async fn finish(&self) -> Result<(), SinkError> {
        (**self).finish().await
    }
}
