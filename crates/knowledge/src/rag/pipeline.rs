//! Query orchestration.
//!
//! One request flows through retrieval and empathetic selection (run
//! concurrently), prompt assembly and generation. Every failure is mapped to
//! a uniform `ErrorResult`; no partial answer is ever returned.

use crate::empathy::EmpatheticSelector;
use crate::generation::GenerationClient;
use crate::retriever::SemanticRetriever;
use crate::types::{AssistantResponse, Query, QueryRequest, RetrievalMatch, DEFAULT_EMOTION};
use nurture_core::config::DEFAULT_QUESTION;
use nurture_core::{AppError, AppResult, ErrorResult};
use nurture_prompt::PromptAssembler;
use std::fmt;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Default end-to-end budget for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Lifecycle of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Retrieving,
    Selecting,
    Assembling,
    Generating,
    Completed,
    Errored,
}

impl PipelineStage {
    pub fn can_transition_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Received, Retrieving)
                | (Retrieving, Selecting)
                | (Retrieving, Errored)
                | (Selecting, Assembling)
                | (Assembling, Generating)
                | (Assembling, Errored)
                | (Generating, Completed)
                | (Generating, Errored)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Completed | PipelineStage::Errored)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Selecting => "selecting",
            PipelineStage::Assembling => "assembling",
            PipelineStage::Generating => "generating",
            PipelineStage::Completed => "completed",
            PipelineStage::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Tracks one request's stage and rejects illegal moves.
#[derive(Debug)]
struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Received,
        }
    }

    fn advance(&mut self, next: PipelineStage) -> AppResult<()> {
        if !self.stage.can_transition_to(next) {
            return Err(AppError::Other(format!(
                "Illegal pipeline transition {} -> {}",
                self.stage, next
            )));
        }
        tracing::debug!("Pipeline stage {} -> {}", self.stage, next);
        self.stage = next;
        Ok(())
    }

    /// Move to `Errored` and hand back the failure.
    fn fail(&mut self, err: AppError) -> AppError {
        tracing::debug!("Pipeline stage {} -> {}", self.stage, PipelineStage::Errored);
        self.stage = PipelineStage::Errored;
        err
    }
}

/// Per-request coordinator over shared, immutable components.
#[derive(Debug)]
pub struct QueryPipeline {
    retriever: SemanticRetriever,
    selector: EmpatheticSelector,
    assembler: PromptAssembler,
    generator: GenerationClient,
    timeout: Duration,
    default_question: String,
}

impl QueryPipeline {
    pub fn new(
        retriever: SemanticRetriever,
        selector: EmpatheticSelector,
        assembler: PromptAssembler,
        generator: GenerationClient,
    ) -> Self {
        Self {
            retriever,
            selector,
            assembler,
            generator,
            timeout: DEFAULT_TIMEOUT,
            default_question: DEFAULT_QUESTION.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_question(mut self, question: impl Into<String>) -> Self {
        self.default_question = question.into();
        self
    }

    pub fn selector(&self) -> &EmpatheticSelector {
        &self.selector
    }

    /// Apply request defaults, then answer.
    pub async fn handle_request(
        &self,
        request: QueryRequest,
    ) -> Result<AssistantResponse, ErrorResult> {
        let query = Query::from_request(request, &self.default_question);
        self.handle_query(query).await
    }

    /// Answer one query. Blank text falls back to the default question and a
    /// blank emotion to `"neutral"`.
    pub async fn handle_query(&self, mut query: Query) -> Result<AssistantResponse, ErrorResult> {
        if query.text.trim().is_empty() {
            tracing::warn!("Query text is blank; using '{}'", self.default_question);
            query.text = self.default_question.clone();
        }
        if query.emotion.trim().is_empty() {
            query.emotion = DEFAULT_EMOTION.to_string();
        }

        tracing::info!(
            "Received query: text={:?}, topic={:?}, emotion={:?}",
            query.text,
            query.topic,
            query.emotion
        );

        match self.run(&query).await {
            Ok(response) => {
                tracing::info!("Generated response: {}", response.text);
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Query failed: {}", e);
                Err(ErrorResult::from(e))
            }
        }
    }

    /// Retrieval only, bounded by the same timeout.
    pub async fn search(&self, text: &str) -> Result<Vec<RetrievalMatch>, ErrorResult> {
        let deadline = Instant::now() + self.timeout;

        let result = match timeout_at(deadline, self.retriever.retrieve(text)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(AppError::Retrieval, "retrieval")),
        };

        result.map_err(|e| {
            tracing::error!("Search failed: {}", e);
            ErrorResult::from(e)
        })
    }

    async fn run(&self, query: &Query) -> AppResult<AssistantResponse> {
        let deadline = Instant::now() + self.timeout;
        let mut stage = StageTracker::new();

        stage.advance(PipelineStage::Retrieving)?;
        let (retrieved, phrase) = tokio::join!(
            timeout_at(deadline, self.retriever.retrieve(&query.text)),
            async { self.selector.select(Some(query.emotion.as_str())) },
        );

        let matches = match retrieved {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => return Err(stage.fail(e)),
            Err(_) => return Err(stage.fail(self.timed_out(AppError::Retrieval, "retrieval"))),
        };

        stage.advance(PipelineStage::Selecting)?;
        tracing::debug!("Selected empathetic phrase: {}", phrase);

        stage.advance(PipelineStage::Assembling)?;
        let prompt = self
            .assembler
            .assemble(&query.text, &matches, &phrase)
            .map_err(|e| stage.fail(e))?;

        stage.advance(PipelineStage::Generating)?;
        let text = match timeout_at(deadline, self.generator.generate(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(stage.fail(e)),
            Err(_) => return Err(stage.fail(self.timed_out(AppError::Generation, "generation"))),
        };

        stage.advance(PipelineStage::Completed)?;
        Ok(AssistantResponse { text })
    }

    fn timed_out(&self, variant: fn(String) -> AppError, during: &str) -> AppError {
        variant(format!(
            "Request timed out after {}s during {}",
            self.timeout.as_secs_f32(),
            during
        ))
    }
}
