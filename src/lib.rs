//! Streaming fan-out pipeline with aggregated error propagation
//!
//! Indexed records are routed to one of N parallel branch transforms.
//! Every branch forwards into one shared destination; the first branch
//! failure is surfaced once, all branches are finalized, and the pipeline
//! reaches `Finished` exactly once.
//!
//! Import everything you need with: `use fanout::prelude::*;`

pub mod app;
pub mod branch;
pub mod domain;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod sink;
pub mod streaming;
