//! Prompt assembly: renders the answer template with retrieved context and
//! the empathetic phrase.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, Passage, PromptDefinition, TONE_DIRECTIVE};
use handlebars::Handlebars;
use nurture_core::{AppError, AppResult};
use std::collections::HashMap;

const TEMPLATE_NAME: &str = "prompt";

/// Concatenate passages as `Title:`/`Content:` blocks separated by a blank line.
///
/// Order is preserved; an empty slice yields an empty string.
pub fn format_context<P: Passage>(passages: &[P]) -> String {
    passages
        .iter()
        .map(|p| format!("Title: {}\nContent: {}", p.title(), p.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a compiled prompt definition.
///
/// Assembly is pure: identical inputs always produce byte-identical output.
pub struct PromptAssembler {
    definition: PromptDefinition,
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for PromptAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptAssembler")
            .field("definition", &self.definition.id)
            .finish()
    }
}

impl PromptAssembler {
    /// Compile a prompt definition.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the template does not parse.
    pub fn new(definition: PromptDefinition) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Prompts are plain text
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(TEMPLATE_NAME, &definition.template)
            .map_err(|e| {
                AppError::Config(format!(
                    "Failed to compile prompt template '{}': {}",
                    definition.id, e
                ))
            })?;

        Ok(Self {
            definition,
            registry,
        })
    }

    pub fn definition(&self) -> &PromptDefinition {
        &self.definition
    }

    /// Assemble the question, retrieved passages and empathetic phrase.
    ///
    /// # Example
    /// ```
    /// use nurture_prompt::{Passage, PromptAssembler, PromptDefinition};
    ///
    /// struct Doc(&'static str, &'static str);
    /// impl Passage for Doc {
    ///     fn title(&self) -> &str { self.0 }
    ///     fn content(&self) -> &str { self.1 }
    /// }
    ///
    /// let assembler = PromptAssembler::new(PromptDefinition::answer()).unwrap();
    /// let built = assembler
    ///     .assemble("Is nausea normal?", &[Doc("Early Signs", "Nausea is common.")], "You're not alone.")
    ///     .unwrap();
    /// assert!(built.user.contains("Title: Early Signs"));
    /// ```
    pub fn assemble<P: Passage>(
        &self,
        question: &str,
        passages: &[P],
        empathetic_phrase: &str,
    ) -> AppResult<BuiltPrompt> {
        tracing::debug!(
            "Assembling prompt '{}' with {} passages",
            self.definition.id,
            passages.len()
        );

        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), format_context(passages));
        variables.insert(
            "empatheticPhrase".to_string(),
            empathetic_phrase.to_string(),
        );
        variables.insert("toneDirective".to_string(), TONE_DIRECTIVE.to_string());

        let user = self
            .registry
            .render(TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Config(format!("Failed to render prompt: {}", e)))?;

        Ok(BuiltPrompt {
            system: self.definition.system_message().to_string(),
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id: self.definition.id.clone(),
                passage_count: passages.len(),
                resolved_variables: variables,
            },
        })
    }
}
