use std::sync::Arc;
use thiserror::Error;

use crate::domain::BranchFailure;
use crate::sink::SinkError;

/// Pipeline-level errors
///
/// `Branch`, `Destination` and `BranchPanicked` are aggregate errors: at
/// most one of them is surfaced per pipeline. `Routing` and `Closed` are
/// returned to the caller of `accept` and never reach observers.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("Branch {branch} failed: {failure}")]
    Branch {
        branch: usize,
        failure: BranchFailure,
    },

    #[error("Destination error: {0}")]
    Destination(Arc<SinkError>),

    #[error("Branch {branch} terminated abnormally")]
    BranchPanicked { branch: usize },

    #[error("No branch at index {index} (pipeline has {branches} branches)")]
    Routing { index: usize, branches: usize },

    #[error("Pipeline no longer accepts input")]
    Closed,
}

impl PipelineError {
    /// The unmodified branch failure, if this error came from a transform
    pub fn branch_failure(&self) -> Option<&BranchFailure> {
        match self {
            Self::Branch { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

impl From<SinkError> for PipelineError {
    fn from(err: SinkError) -> Self {
        Self::Destination(Arc::new(err))
    }
}
