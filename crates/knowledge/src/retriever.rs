//! Semantic retrieval: embed the question, query the index, project matches.

use crate::embeddings::EmbeddingProvider;
use crate::types::RetrievalMatch;
use crate::vector_index::{VectorIndex, VectorMatch};
use nurture_core::config::MAX_TOP_K;
use nurture_core::{AppError, AppResult};
use std::sync::Arc;

/// Default number of passages requested per query.
pub const DEFAULT_TOP_K: usize = MAX_TOP_K;

/// Embeds questions and fetches the nearest passages.
#[derive(Debug, Clone)]
pub struct SemanticRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the passage count, clamped to `1..=MAX_TOP_K`.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        if top_k > MAX_TOP_K {
            tracing::warn!("top_k {} exceeds the limit; using {}", top_k, MAX_TOP_K);
        }
        self.top_k = top_k.clamp(1, MAX_TOP_K);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve at most `top_k` passages for `text`, most similar first.
    ///
    /// An empty result is not an error. Any failure from the embedder or the
    /// index surfaces as `AppError::Retrieval`.
    #[tracing::instrument(skip(self), fields(top_k = self.top_k))]
    pub async fn retrieve(&self, text: &str) -> AppResult<Vec<RetrievalMatch>> {
        let vector = self.embedder.embed(text).await.map_err(as_retrieval)?;

        let matches = self
            .index
            .query(&vector, self.top_k, true)
            .await
            .map_err(as_retrieval)?;

        let mut passages = matches
            .iter()
            .map(project)
            .collect::<AppResult<Vec<_>>>()?;
        passages.truncate(self.top_k);

        tracing::info!(
            "Retrieved {} passages from {} index",
            passages.len(),
            self.index.backend_name()
        );
        Ok(passages)
    }
}

fn as_retrieval(err: AppError) -> AppError {
    match err {
        AppError::Retrieval(_) => err,
        other => AppError::Retrieval(other.to_string()),
    }
}

/// Take `title` and `content` from match metadata.
fn project(m: &VectorMatch) -> AppResult<RetrievalMatch> {
    let field = |name: &str| {
        m.metadata
            .as_ref()
            .and_then(|meta| meta.get(name))
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Retrieval(format!("Match '{}' has no '{}' in its metadata", m.id, name))
            })
    };

    Ok(RetrievalMatch {
        title: field("title")?,
        content: field("content")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    /// Returns `count` well-formed matches regardless of `top_k`.
    #[derive(Debug)]
    struct OversizedIndex {
        count: usize,
    }

    #[async_trait::async_trait]
    impl VectorIndex for OversizedIndex {
        fn backend_name(&self) -> &str {
            "oversized"
        }

        async fn query(&self, _: &[f32], _: usize, _: bool) -> AppResult<Vec<VectorMatch>> {
            Ok((0..self.count)
                .map(|i| VectorMatch {
                    id: format!("m{}", i),
                    score: 1.0,
                    metadata: Some(serde_json::json!({
                        "title": format!("Passage {}", i),
                        "content": "text",
                    })),
                })
                .collect())
        }
    }

    fn retriever(count: usize) -> SemanticRetriever {
        SemanticRetriever::new(
            Arc::new(TrigramProvider::new(32)),
            Arc::new(OversizedIndex { count }),
        )
    }

    #[test]
    fn test_top_k_clamped_to_limit() {
        assert_eq!(retriever(0).with_top_k(8).top_k(), MAX_TOP_K);
        assert_eq!(retriever(0).with_top_k(0).top_k(), 1);
        assert_eq!(retriever(0).with_top_k(3).top_k(), 3);
    }

    #[tokio::test]
    async fn test_large_top_k_never_returns_more_than_limit() {
        let matches = retriever(8).with_top_k(8).retrieve("signs").await.unwrap();

        assert_eq!(matches.len(), MAX_TOP_K);
        assert_eq!(matches[0].title, "Passage 0");
        assert_eq!(matches[4].title, "Passage 4");
    }

    fn vector_match(id: &str, metadata: Option<serde_json::Value>) -> VectorMatch {
        VectorMatch {
            id: id.to_string(),
            score: 0.5,
            metadata,
        }
    }

    #[test]
    fn test_project_reads_title_and_content() {
        let m = vector_match(
            "a",
            Some(serde_json::json!({"title": "Early Signs", "content": "Missed period.", "source": "x"})),
        );
        let projected = project(&m).unwrap();
        assert_eq!(projected.title, "Early Signs");
        assert_eq!(projected.content, "Missed period.");
    }

    #[test]
    fn test_project_missing_content_is_retrieval_error() {
        let m = vector_match("a", Some(serde_json::json!({"title": "Early Signs"})));
        let err = project(&m).unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn test_project_without_metadata_fails() {
        assert!(project(&vector_match("a", None)).is_err());
    }

    #[test]
    fn test_as_retrieval_keeps_retrieval_errors() {
        let kept = as_retrieval(AppError::Retrieval("down".to_string()));
        assert_eq!(kept.to_string(), "Retrieval error: down");

        let wrapped = as_retrieval(AppError::Other("boom".to_string()));
        assert!(matches!(wrapped, AppError::Retrieval(_)));
    }
}
