//! Corpus command handler.

use clap::Args;
use nurture_core::{config::AppConfig, AppResult};
use nurture_knowledge::Corpora;

/// Show corpus statistics
#[derive(Args, Debug)]
pub struct CorpusCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing corpus command");

        let resources_path = config.resource_corpus_path();
        let utterances_path = config.utterance_corpus_path();
        let stats = Corpora::load(&resources_path, &utterances_path).stats();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Resources:  {} ({})", stats.resources, resources_path.display());
        println!("Utterances: {} ({})", stats.utterances, utterances_path.display());
        if stats.tags.is_empty() {
            println!("Tags:       (none)");
        } else {
            println!("Tags:       {}", stats.tags.join(", "));
        }

        Ok(())
    }
}
