//! Maternal-health knowledge pipeline.
//!
//! Answers a question by retrieving passages from a vector index, picking an
//! empathetic phrase for the user's emotion, assembling one prompt and asking
//! a chat model to respond.

pub mod corpus;
pub mod embeddings;
pub mod empathy;
pub mod generation;
pub mod memory_index;
pub mod pinecone_index;
pub mod rag;
pub mod retriever;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use corpus::{Corpora, CorpusStats};
pub use empathy::{EmpatheticSelector, DEFAULT_EMPATHETIC_PHRASE};
pub use rag::{PipelineStage, QueryPipeline};
pub use retriever::SemanticRetriever;
pub use types::{
    AssistantResponse, EmpatheticUtterance, Query, QueryRequest, Resource, RetrievalMatch,
};
