//! Nurture CLI
//!
//! Main entry point for the nurture command-line tool: ask maternal-health
//! questions, inspect retrieval and the empathetic phrase corpus.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CorpusCommand, EmpathizeCommand, SearchCommand};
use nurture_core::logging::{self, LogFormat};
use nurture_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Nurture - empathetic maternal-health answers grounded in a curated guide
#[derive(Parser, Debug)]
#[command(name = "nurture")]
#[command(about = "Empathetic maternal-health answers grounded in a curated guide", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "NURTURE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "NURTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Log output format (text, json)
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, ollama)
    #[arg(short, long, global = true, env = "NURTURE_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "NURTURE_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question and get an empathetic answer
    Ask(AskCommand),

    /// Show the passages retrieved for a question
    Search(SearchCommand),

    /// Pick an empathetic phrase for an emotion
    Empathize(EmpathizeCommand),

    /// Show corpus statistics
    Corpus(CorpusCommand),
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (expected text or json)", s))
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.log_format,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        config.log_format,
        config.log_file.as_deref(),
    )?;

    tracing::info!("Nurture CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("LLM: {} ({})", config.llm.provider, config.llm.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
        Commands::Empathize(_) => "empathize",
        Commands::Corpus(_) => "corpus",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Empathize(cmd) => cmd.execute(&config),
        Commands::Corpus(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
