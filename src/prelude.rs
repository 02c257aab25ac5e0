//! Prelude module for convenient imports
//!
//! Import everything you need with: `use fanout::prelude::*;`

// Domain types
pub use crate::domain::{BranchFailure, PipelineState, Record};

// Branch types
pub use crate::branch::{Branch, BranchTransform, DEFAULT_SENTINEL, RejectSentinel};

// Destination types
pub use crate::sink::{CollectingSink, Destination, SinkError, WriterSink};

// Pipeline types
pub use crate::pipeline::{
    BranchReport, FanOut, FanOutBuilder, PipelineConfig, PipelineError, PipelineEvent,
    PipelineEvents, PipelineOutcome,
};

// IO types
pub use crate::io::{CsvRecordStream, IoError, RawRecord, read_records, write_records};

// Streaming types
pub use crate::streaming::{
    AbortOnError, ErrorPolicy, FeedReport, FeedSession, SilentSkip, SkipErrors,
};

// App types
pub use crate::app::{AppError, CliApp, Writers};
