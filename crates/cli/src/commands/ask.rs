//! Ask command handler.

use clap::Args;
use nurture_core::{config::AppConfig, AppResult};
use nurture_knowledge::{QueryPipeline, QueryRequest};

/// Ask a question and get an empathetic answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question (default: "What are the signs of pregnancy?")
    pub question: Option<String>,

    /// Topic label, logged with the request
    #[arg(short, long)]
    pub topic: Option<String>,

    /// How the user feels (e.g. happy, sad, anxious)
    #[arg(short, long)]
    pub emotion: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let pipeline = QueryPipeline::from_config(config).await?;

        let request = QueryRequest {
            text: self.question.clone(),
            topic: self.topic.clone(),
            emotion: self.emotion.clone(),
        };

        match pipeline.handle_request(request).await {
            Ok(response) if self.json => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            Ok(response) => {
                println!("{}", response.text);
                Ok(())
            }
            Err(failure) => super::report_failure(failure),
        }
    }
}
