//! Retrieval-augmented answering.
//!
//! `pipeline` holds the per-request state machine; `bootstrap` wires it from
//! configuration.

pub mod bootstrap;
pub mod pipeline;

pub use pipeline::{PipelineStage, QueryPipeline, DEFAULT_TIMEOUT};
