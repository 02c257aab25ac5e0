pub mod error;
pub mod memory;
pub mod traits;
pub mod writer;

// Re-export commonly used types
pub use error::SinkError;
pub use memory::CollectingSink;
pub use traits::Destination;
pub use writer::WriterSink;
