pub mod lane;
pub mod transform;

// Re-export commonly used types
pub use lane::Branch;
pub use transform::{BranchTransform, DEFAULT_SENTINEL, RejectSentinel};
