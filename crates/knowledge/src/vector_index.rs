//! Vector index abstraction for the resource corpus.
//!
//! Defines a provider-agnostic nearest-neighbour query. Matches carry the
//! passage as free-form metadata; projection to title/content happens in the
//! retriever.

use nurture_core::AppResult;
use serde::{Deserialize, Serialize};

/// A single nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,

    #[serde(default)]
    pub score: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Trait for vector index backends.
///
/// Implementations return at most `top_k` matches ordered by descending
/// similarity, and report every failure as `AppError::Retrieval`.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync + std::fmt::Debug {
    /// Backend name for diagnostics (e.g., "pinecone", "memory").
    fn backend_name(&self) -> &str;

    /// Query the `top_k` nearest entries to `vector`.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> AppResult<Vec<VectorMatch>>;
}
