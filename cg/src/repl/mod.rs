//! Interactive chat REPL
//!
//! Line-edited chat with slash commands. Rendering and loop control only;
//! intent logic lives in the dispatcher.

mod session;

pub use session::{ReplSession, render_task};

use std::sync::Arc;

use eyre::Result;

use taskstore::{JsonFileStore, TaskStore};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::llm;

/// Run the interactive chat session
///
/// This is the main entry point for `cg chat`.
pub async fn run_interactive(config: &Config, initial_utterance: Option<String>) -> Result<()> {
    config.validate()?;

    let llm = llm::create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;

    let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::open(&config.storage.tasks_file)?);

    let mut session = ReplSession::new(
        llm,
        Dispatcher::new(store),
        config.storage.tasks_file.clone(),
    );
    session.run(initial_utterance).await
}
