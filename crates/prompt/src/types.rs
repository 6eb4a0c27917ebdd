//! Prompt types for Nurture.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the built-in answer prompt.
pub const ANSWER_PROMPT_ID: &str = "answer";

/// Assistant persona sent as the system message.
pub const DEFAULT_PERSONA: &str = "You are an empathetic and culturally inclusive women's health \
assistant who specializes in maternal health and directly answers the user's questions in the \
second person, focusing on their needs and concerns.";

/// Closing instruction appended to every answer prompt.
pub const TONE_DIRECTIVE: &str = "Respond in an empathetic tone, directly addressing the user in \
the second person. Avoid switching to first person unless explicitly required by the query.";

/// Handlebars template of the built-in answer prompt.
pub const DEFAULT_ANSWER_TEMPLATE: &str = "The user asked: \"{{question}}\"
Relevant Context:
{{context}}

Empathetic Response: {{empatheticPhrase}}
{{toneDirective}}";

/// A retrieved passage that can be placed in the prompt context.
pub trait Passage {
    fn title(&self) -> &str;
    fn content(&self) -> &str;
}

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// System message; the built-in persona is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// The built-in answer prompt.
    pub fn answer() -> Self {
        Self {
            id: ANSWER_PROMPT_ID.to_string(),
            title: "Empathetic maternal-health answer".to_string(),
            api_version: "1.0".to_string(),
            system: Some(DEFAULT_PERSONA.to_string()),
            template: DEFAULT_ANSWER_TEMPLATE.to_string(),
        }
    }

    /// Replace the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// System message to send, falling back to the built-in persona.
    pub fn system_message(&self) -> &str {
        self.system.as_deref().unwrap_or(DEFAULT_PERSONA)
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// User message
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Number of passages placed in the context block
    #[serde(rename = "passageCount")]
    pub passage_count: usize,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}
