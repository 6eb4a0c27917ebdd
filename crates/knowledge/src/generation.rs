//! Chat completion for the assembled prompt.

use nurture_core::{AppError, AppResult};
use nurture_llm::{LlmClient, LlmRequest};
use nurture_prompt::BuiltPrompt;
use std::sync::Arc;

/// Sends one prompt per request to the configured chat model.
#[derive(Clone)]
pub struct GenerationClient {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .finish()
    }
}

impl GenerationClient {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete `prompt` (persona as system message, body as user message)
    /// and return the first choice's text unmodified.
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn generate(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        let request = LlmRequest::new(prompt.user.clone(), self.model.clone())
            .with_system(prompt.system.clone());

        tracing::debug!(
            "Requesting completion from {} ({})",
            self.client.provider_name(),
            self.model
        );

        let response = self.client.complete(&request).await.map_err(|e| match e {
            AppError::Generation(_) => e,
            other => AppError::Generation(other.to_string()),
        })?;

        tracing::debug!(
            "Completion used {} tokens",
            response.usage.total_tokens
        );
        Ok(response.content)
    }
}
