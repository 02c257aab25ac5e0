pub mod cli;
pub mod error;

// Re-export commonly used types
pub use cli::{CliApp, CliRunner, LOG_ENV, Writers};
pub use error::AppError;
