use tracing::{error, warn};

use crate::io::IoError;
use crate::pipeline::PipelineError;

/// Policy for handling input errors while feeding a pipeline
///
/// Only upstream problems go through the policy. Branch failures always
/// terminate the pipeline and are never offered here.
pub trait ErrorPolicy: Send + Sync {
    /// Handle an IO error (CSV parsing, reading)
    /// Return true to continue feeding, false to abort
    fn handle_io_error(&self, error: IoError) -> bool;

    /// Handle a record the coordinator refused to route
    /// Return true to continue feeding, false to abort
    fn handle_routing_error(&self, error: PipelineError) -> bool;
}

/// Skip bad input and continue (logged as warnings)
#[derive(Debug, Clone, Copy)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_io_error(&self, error: IoError) -> bool {
        warn!(error = %error, "Skipping unreadable record");
        true
    }

    fn handle_routing_error(&self, error: PipelineError) -> bool {
        warn!(error = %error, "Skipping unroutable record");
        true
    }
}

/// Stop feeding on the first bad input
#[derive(Debug, Clone, Copy)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_io_error(&self, error: IoError) -> bool {
        error!(error = %error, "Unreadable record, aborting input");
        false
    }

    fn handle_routing_error(&self, error: PipelineError) -> bool {
        error!(error = %error, "Unroutable record, aborting input");
        false
    }
}

/// Silent error policy - skip bad input without logging
#[derive(Debug, Clone, Copy)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_io_error(&self, _error: IoError) -> bool {
        true
    }

    fn handle_routing_error(&self, _error: PipelineError) -> bool {
        true
    }
}
