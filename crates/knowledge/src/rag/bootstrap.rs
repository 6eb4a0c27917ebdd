//! Build a `QueryPipeline` from application configuration.

use crate::corpus::Corpora;
use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::empathy::EmpatheticSelector;
use crate::generation::GenerationClient;
use crate::memory_index::MemoryIndex;
use crate::pinecone_index::PineconeIndex;
use crate::rag::pipeline::QueryPipeline;
use crate::retriever::SemanticRetriever;
use crate::vector_index::VectorIndex;
use nurture_core::config::AppConfig;
use nurture_core::{AppError, AppResult};
use nurture_prompt::{load_answer_prompt, PromptAssembler};
use std::sync::Arc;
use std::time::Duration;

impl QueryPipeline {
    /// Load corpora and wire every component named in `config`.
    ///
    /// # Errors
    /// Returns `AppError::Config` for invalid settings, a missing API key,
    /// or a prompt override that does not load.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let corpora = Corpora::load(
            &config.resource_corpus_path(),
            &config.utterance_corpus_path(),
        );
        Self::from_corpora(config, corpora).await
    }

    /// Wire the pipeline over already-loaded corpora.
    pub async fn from_corpora(config: &AppConfig, corpora: Corpora) -> AppResult<Self> {
        let embedder = build_embedder(config)?;
        let index = build_index(config, &corpora, embedder.as_ref()).await?;

        let retriever = SemanticRetriever::new(embedder, index).with_top_k(config.index.top_k);
        let selector = EmpatheticSelector::new(corpora.utterances.clone());

        let mut definition = load_answer_prompt(&config.workspace)?;
        if let Some(system) = &config.llm.system_prompt {
            definition = definition.with_system(system.clone());
        }
        let assembler = PromptAssembler::new(definition)?;

        let generator = GenerationClient::new(build_llm(config)?, config.llm.model.clone());

        tracing::info!(
            "Pipeline ready: llm={}/{}, embedding={}/{}, index={}",
            config.llm.provider,
            config.llm.model,
            config.embedding.provider,
            config.embedding.model,
            config.index.provider
        );

        Ok(Self::new(retriever, selector, assembler, generator)
            .with_timeout(Duration::from_secs(config.pipeline.timeout_secs))
            .with_default_question(config.pipeline.default_question.clone()))
    }
}

fn build_embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let api_key = config.resolve_api_key(&config.embedding.api_key_env);
    create_provider(&config.embedding, api_key.as_deref())
}

async fn build_index(
    config: &AppConfig,
    corpora: &Corpora,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<Arc<dyn VectorIndex>> {
    let settings = &config.index;
    match settings.provider.as_str() {
        "memory" => Ok(Arc::new(MemoryIndex::build(&corpora.resources, embedder).await?)),

        "pinecone" => {
            let host = settings.host.as_deref().ok_or_else(|| {
                AppError::Config(format!("Index '{}' has no host configured", settings.name))
            })?;
            let api_key = config.resolve_api_key(&settings.api_key_env).ok_or_else(|| {
                AppError::Config(format!(
                    "Index '{}' requires an API key in {}",
                    settings.name, settings.api_key_env
                ))
            })?;
            Ok(Arc::new(PineconeIndex::new(&settings.name, host, &api_key)?))
        }

        other => Err(AppError::Config(format!("Unknown index provider: {}", other))),
    }
}

fn build_llm(config: &AppConfig) -> AppResult<Arc<dyn nurture_llm::LlmClient>> {
    let api_key = config.resolve_api_key(&config.llm.api_key_env);
    nurture_llm::create_client(
        &config.llm.provider,
        config.llm.endpoint.as_deref(),
        api_key.as_deref(),
    )
    .map_err(|e| AppError::Config(format!("Failed to create LLM client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmpatheticUtterance, Resource};
    use tempfile::TempDir;

    fn offline_config(workspace: &std::path::Path) -> AppConfig {
        let mut config = AppConfig {
            workspace: workspace.to_path_buf(),
            ..Default::default()
        };
        config.llm.provider = "ollama".to_string();
        config.embedding.provider = "trigram".to_string();
        config.embedding.dimensions = 256;
        config.index.provider = "memory".to_string();
        config
    }

    #[tokio::test]
    async fn test_offline_pipeline_builds() {
        let temp = TempDir::new().unwrap();
        let corpora = Corpora::new(
            vec![Resource {
                title: "Early Signs".to_string(),
                content: "Missed period and nausea.".to_string(),
                source: None,
            }],
            vec![EmpatheticUtterance::new("happy", "That's wonderful!")],
        );

        let pipeline = QueryPipeline::from_corpora(&offline_config(temp.path()), corpora)
            .await
            .unwrap();
        assert_eq!(pipeline.selector().select(Some("happy")), "That's wonderful!");

        let matches = pipeline.search("signs of pregnancy").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Early Signs");
    }

    #[tokio::test]
    async fn test_missing_corpora_still_build() {
        let temp = TempDir::new().unwrap();
        let pipeline = QueryPipeline::from_config(&offline_config(temp.path()))
            .await
            .unwrap();

        assert!(pipeline.search("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pinecone_without_host_is_config_error() {
        let temp = TempDir::new().unwrap();
        let mut config = offline_config(temp.path());
        config.index.provider = "pinecone".to_string();
        config.index.host = None;

        let err = QueryPipeline::from_config(&config).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_pinecone_without_key_is_config_error() {
        let temp = TempDir::new().unwrap();
        let mut config = offline_config(temp.path());
        config.index.provider = "pinecone".to_string();
        config.index.host = Some("idx.example.pinecone.io".to_string());
        config.index.api_key_env = "NURTURE_TEST_UNSET_PINECONE_KEY".to_string();

        let err = QueryPipeline::from_corpora(&config, Corpora::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn test_openai_llm_without_key_is_config_error() {
        let temp = TempDir::new().unwrap();
        let mut config = offline_config(temp.path());
        config.llm.provider = "openai".to_string();
        config.llm.api_key_env = "NURTURE_TEST_UNSET_OPENAI_KEY".to_string();

        let err = QueryPipeline::from_corpora(&config, Corpora::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
