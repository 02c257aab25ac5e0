pub mod error;
pub mod session;

// Re-export commonly used types
pub use error::{AbortOnError, ErrorPolicy, SilentSkip, SkipErrors};
pub use session::{FeedReport, FeedSession};
