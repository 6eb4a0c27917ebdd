//! Query embedding.
//!
//! The same provider embeds the corpus (for the in-memory index) and incoming
//! questions, so both sides share one vector space.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
