pub mod error;
pub mod record;
pub mod state;

// Re-export commonly used types
pub use error::BranchFailure;
pub use record::Record;
pub use state::{PipelineState, StateCell};
