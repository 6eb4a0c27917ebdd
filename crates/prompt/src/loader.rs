//! Prompt loader for workspace YAML prompt definitions.

use crate::types::PromptDefinition;
use nurture_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Path of a prompt definition file inside the workspace.
pub fn prompt_path(workspace_path: &Path, prompt_id: &str) -> PathBuf {
    workspace_path
        .join(".nurture/prompts")
        .join(format!("{}.yml", prompt_id))
}

/// Load a prompt definition by ID from the workspace.
///
/// Looks for `<id>.yml` in the `.nurture/prompts/` directory.
///
/// # Example
/// ```no_run
/// use nurture_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompt_path(workspace_path, prompt_id);

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Config(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Config(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Config(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the answer prompt, preferring a workspace override over the built-in one.
pub fn load_answer_prompt(workspace_path: &Path) -> AppResult<PromptDefinition> {
    let id = crate::types::ANSWER_PROMPT_ID;
    if prompt_path(workspace_path, id).exists() {
        load_prompt(workspace_path, id)
    } else {
        tracing::debug!("No workspace override for prompt '{}', using built-in", id);
        Ok(PromptDefinition::answer())
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Config("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Config("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Config(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Config(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if matches!(def.system.as_deref(), Some(s) if s.trim().is_empty()) {
        return Err(AppError::Config(
            "Prompt system message cannot be blank".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, content: &str) -> PathBuf {
        let file_path = prompt_path(dir, id);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn valid_prompt(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Test Prompt"
apiVersion: "1.0"
system: "You are a doula."
template: "Question: {{{{question}}}}"
"#,
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "answer", &valid_prompt("answer"));

        let prompt = load_prompt(temp_dir.path(), "answer").unwrap();
        assert_eq!(prompt.id, "answer");
        assert_eq!(prompt.title, "Test Prompt");
        assert_eq!(prompt.template, "Question: {{question}}");
        assert_eq!(prompt.system_message(), "You are a doula.");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");

        let result = load_prompt(temp_dir.path(), "invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_api_version() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "answer",
            "id: answer\ntitle: T\napiVersion: \"1\"\ntemplate: \"x\"\n",
        );

        let result = load_prompt(temp_dir.path(), "answer");
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("apiVersion")));
    }

    #[test]
    fn test_answer_prompt_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_answer_prompt(temp_dir.path()).unwrap();
        assert_eq!(prompt, PromptDefinition::answer());
    }

    #[test]
    fn test_answer_prompt_prefers_override() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "answer", &valid_prompt("answer"));

        let prompt = load_answer_prompt(temp_dir.path()).unwrap();
        assert_eq!(prompt.title, "Test Prompt");
    }
}
