//! Prompt system for Nurture.
//!
//! This crate provides:
//! - The Handlebars-based prompt assembler
//! - The built-in answer prompt and assistant persona
//! - YAML prompt overrides loaded from the workspace

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{format_context, PromptAssembler};
pub use loader::{load_answer_prompt, load_prompt};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, Passage, PromptDefinition, DEFAULT_PERSONA, TONE_DIRECTIVE,
};
