//! Concierge - conversational task manager
//!
//! CLI entry point for the chat REPL, the TUI dashboard and one-shot runs.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use concierge::cli::{Cli, Command, OutputFormat};
use concierge::config::Config;
use concierge::dispatcher::Dispatcher;
use concierge::llm;
use concierge::repl;
use concierge::tui;
use taskstore::{JsonFileStore, TaskStore};

/// Log location: a `logs` directory next to the default tasks file, so
/// everything concierge writes lives under one data root.
fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("concierge")
        .join("logs")
}

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout/stderr - the terminal belongs to the chat
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("concierge.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}


#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Concierge loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Chat { utterance }) => repl::run_interactive(&config, utterance).await,
        Some(Command::Once { utterance, format }) => cmd_once(&config, &utterance, format).await,
        Some(Command::Tui) => tui::run(&config).await,
        None => repl::run_interactive(&config, None).await,
    }
}

/// Run a single utterance through the classifier and print the reply
async fn cmd_once(config: &Config, utterance: &str, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let llm = llm::create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::open(&config.storage.tasks_file)?);
    let dispatcher = Dispatcher::new(store);

    let intent = llm::classify(&llm, utterance).await;
    let reply = dispatcher.dispatch(&intent)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        OutputFormat::Text => {
            println!("{}", reply.text());
            // Ids matter when the caller is a script, so every carried task
            // is spelled out, not just listings
            for task in reply.tasks() {
                println!("  {}", repl::render_task(task));
            }
        }
    }

    Ok(())
}
