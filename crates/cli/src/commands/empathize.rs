//! Empathize command handler.

use clap::Args;
use nurture_core::{config::AppConfig, AppResult};
use nurture_knowledge::{Corpora, EmpatheticSelector};

/// Pick an empathetic phrase for an emotion
#[derive(Args, Debug)]
pub struct EmpathizeCommand {
    /// Emotion tag (default: neutral)
    #[arg(short, long)]
    pub emotion: Option<String>,

    /// List every matching phrase instead of picking one
    #[arg(long)]
    pub all: bool,
}

impl EmpathizeCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing empathize command");

        let corpora = Corpora::load(
            &config.resource_corpus_path(),
            &config.utterance_corpus_path(),
        );
        let selector = EmpatheticSelector::new(corpora.utterances.clone());

        if self.all {
            let tag = self
                .emotion
                .as_deref()
                .unwrap_or(nurture_knowledge::types::DEFAULT_EMOTION);
            for phrase in selector.candidates(tag) {
                println!("{}", phrase);
            }
        } else {
            println!("{}", selector.select(self.emotion.as_deref()));
        }

        Ok(())
    }
}
