//! Search command handler.
//!
//! Runs retrieval alone, to check that the index answers and what it returns.

use clap::Args;
use nurture_core::{config::AppConfig, AppResult};
use nurture_knowledge::QueryPipeline;

/// Show the passages retrieved for a question
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The question to embed and look up
    pub question: String,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let pipeline = QueryPipeline::from_config(config).await?;

        match pipeline.search(&self.question).await {
            Ok(matches) => {
                println!("{}", serde_json::to_string_pretty(&matches)?);
                Ok(())
            }
            Err(failure) => super::report_failure(failure),
        }
    }
}
