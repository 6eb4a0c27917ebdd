//! Test doubles for the external services.

use crate::embeddings::providers::TrigramProvider;
use crate::embeddings::EmbeddingProvider;
use crate::empathy::EmpatheticSelector;
use crate::generation::GenerationClient;
use crate::rag::QueryPipeline;
use crate::retriever::SemanticRetriever;
use crate::types::EmpatheticUtterance;
use crate::vector_index::{VectorIndex, VectorMatch};
use nurture_core::{AppError, AppResult};
use nurture_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use nurture_prompt::{PromptAssembler, PromptDefinition};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DIMENSIONS: usize = 256;

pub fn embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(TrigramProvider::new(DIMENSIONS))
}

/// Embedder that fails like an unreachable embedding service.
#[derive(Debug)]
pub struct FailingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "failing-v1"
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    async fn embed_batch(&self, _: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Err(AppError::Other(
            "Failed to reach embedding service: connection reset".to_string(),
        ))
    }
}

/// Index that always returns the same matches.
#[derive(Debug, Default)]
pub struct StaticIndex {
    pub matches: Vec<VectorMatch>,
}

impl StaticIndex {
    pub fn with_passages(passages: &[(&str, &str)]) -> Self {
        let matches = passages
            .iter()
            .enumerate()
            .map(|(i, (title, content))| VectorMatch {
                id: format!("m{}", i),
                score: 1.0 - i as f32 * 0.1,
                metadata: Some(serde_json::json!({"title": title, "content": content})),
            })
            .collect();
        Self { matches }
    }
}

#[async_trait::async_trait]
impl VectorIndex for StaticIndex {
    fn backend_name(&self) -> &str {
        "static"
    }

    async fn query(&self, _: &[f32], _: usize, _: bool) -> AppResult<Vec<VectorMatch>> {
        Ok(self.matches.clone())
    }
}

/// Index that fails like an unreachable service.
#[derive(Debug)]
pub struct FailingIndex;

#[async_trait::async_trait]
impl VectorIndex for FailingIndex {
    fn backend_name(&self) -> &str {
        "failing"
    }

    async fn query(&self, _: &[f32], _: usize, _: bool) -> AppResult<Vec<VectorMatch>> {
        Err(AppError::Retrieval(
            "Failed to reach index 'maternal-knowledge': connection refused".to_string(),
        ))
    }
}

/// Index that never answers within a test timeout.
#[derive(Debug)]
pub struct StalledIndex;

#[async_trait::async_trait]
impl VectorIndex for StalledIndex {
    fn backend_name(&self) -> &str {
        "stalled"
    }

    async fn query(&self, _: &[f32], _: usize, _: bool) -> AppResult<Vec<VectorMatch>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

/// How the fake model answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
    Stall,
}

/// Chat model fake that records every request.
#[derive(Debug)]
pub struct RecordingLlm {
    reply: Reply,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl RecordingLlm {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> LlmRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reply {
            Reply::Text(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            }),
            Reply::Fail(message) => Err(AppError::Generation(message.clone())),
            Reply::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(AppError::Generation("unreachable".to_string()))
            }
        }
    }
}

pub fn utterances() -> Arc<[EmpatheticUtterance]> {
    vec![
        EmpatheticUtterance::new("happy", "That's wonderful to hear!"),
        EmpatheticUtterance::new("neutral", "Thanks for reaching out."),
    ]
    .into()
}

pub fn pipeline(
    index: Arc<dyn VectorIndex>,
    utterances: Arc<[EmpatheticUtterance]>,
    llm: Arc<RecordingLlm>,
) -> QueryPipeline {
    pipeline_with_embedder(embedder(), index, utterances, llm)
}

pub fn pipeline_with_embedder(
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    utterances: Arc<[EmpatheticUtterance]>,
    llm: Arc<RecordingLlm>,
) -> QueryPipeline {
    let retriever = SemanticRetriever::new(embedder, index);
    let selector = EmpatheticSelector::seeded(utterances, 1);
    let assembler = PromptAssembler::new(PromptDefinition::answer()).unwrap();
    let generator = GenerationClient::new(llm, "gpt-3.5-turbo");

    QueryPipeline::new(retriever, selector, assembler, generator)
}
