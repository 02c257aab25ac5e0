//! Fan-out coordinator
//!
//! A [`FanOut`] owns N branch workers that all forward into one shared
//! [`Destination`](crate::sink::Destination). The first failure reported
//! by any branch becomes the pipeline's single aggregate error, cancels
//! every branch, and the pipeline then reaches `Finished` exactly once.
//!
//! There are no timeouts: a branch stuck inside its destination stalls
//! [`FanOut::join`] until it returns.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
mod worker;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use coordinator::{BranchReport, FanOut, FanOutBuilder, PipelineOutcome};
pub use error::PipelineError;
pub use events::{PipelineEvent, PipelineEvents};
