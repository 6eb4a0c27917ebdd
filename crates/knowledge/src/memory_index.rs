//! In-process vector index built from the resource corpus at startup.

use crate::embeddings::EmbeddingProvider;
use crate::types::Resource;
use crate::vector_index::{VectorIndex, VectorMatch};
use nurture_core::{AppError, AppResult};
use std::cmp::Ordering;

#[derive(Debug)]
struct Entry {
    id: String,
    vector: Vec<f32>,
    metadata: serde_json::Value,
}

/// Brute-force cosine index over embedded passages.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: Vec<Entry>,
}

impl MemoryIndex {
    /// Embed every resource's content and index it under `resource-<n>`.
    pub async fn build(resources: &[Resource], embedder: &dyn EmbeddingProvider) -> AppResult<Self> {
        if resources.is_empty() {
            tracing::warn!("Resource corpus is empty; in-memory index has no entries");
            return Ok(Self::default());
        }

        let texts: Vec<String> = resources.iter().map(|r| r.content.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        if vectors.len() != resources.len() {
            return Err(AppError::Retrieval(format!(
                "Embedded {} of {} resources",
                vectors.len(),
                resources.len()
            )));
        }

        let entries = resources
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (resource, vector))| Entry {
                id: format!("resource-{}", i),
                vector,
                metadata: serde_json::json!({
                    "title": resource.title,
                    "content": resource.content,
                    "source": resource.source,
                }),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "Built in-memory index with {} entries using {}",
            entries.len(),
            embedder.model_name()
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> AppResult<Vec<VectorMatch>> {
        let mut scored: Vec<(&Entry, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, cosine_similarity(vector, &entry.vector)))
            .collect();

        // Stable sort keeps corpus order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(entry, score)| VectorMatch {
                id: entry.id.clone(),
                score,
                metadata: include_metadata.then(|| entry.metadata.clone()),
            })
            .collect())
    }
}

/// Cosine similarity; zero when either vector is zero or widths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
