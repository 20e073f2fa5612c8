//! Terminal User Interface for Concierge
//!
//! A two-pane chat dashboard:
//! - Left pane: the conversation with the assistant
//! - Right pane: the live task board with open/done counts
//! - Bottom line: the message input
//!
//! Esc or Ctrl+C leaves; an `exit` intent leaves after the farewell.

mod app;
mod events;
mod runner;
mod views;

pub use app::{App, ChatLine, ChatRole};
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use taskstore::{JsonFileStore, TaskStore};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::llm;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI chat dashboard
///
/// This is the main entry point for `cg tui`.
pub async fn run(config: &Config) -> Result<()> {
    config.validate()?;

    let llm = llm::create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;

    let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::open(&config.storage.tasks_file)?);

    let terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, llm, Dispatcher::new(store));
    runner.run().await
}
