//! TUI runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Drawing the UI and dispatching events to App for handling
//! - Running queued utterances through the classifier and dispatcher
//! - Re-reading the task file so the board pane stays current

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::Result;
use tracing::debug;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::dispatcher::Dispatcher;
use crate::llm::{self, LlmClient};

/// How often to re-read the task file for the board pane
const BOARD_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Intent classifier
    llm: Arc<dyn LlmClient>,
    /// Intent resolution against the store
    dispatcher: Dispatcher,
    /// Event handler
    event_handler: EventHandler,
    /// Last board refresh time
    last_refresh: Instant,
}

impl TuiRunner {
    pub fn new(terminal: Tui, llm: Arc<dyn LlmClient>, dispatcher: Dispatcher) -> Self {
        Self {
            app: App::new(),
            terminal,
            llm,
            dispatcher,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            last_refresh: Instant::now(),
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        self.app.tasks = self.dispatcher.store().load();

        loop {
            self.terminal.draw(|frame| views::render(&self.app, frame))?;

            // Checked after the draw so a farewell reply is rendered once
            if self.app.should_quit {
                break;
            }

            match self.event_handler.next().await? {
                Event::Tick => {
                    self.handle_tick().await;
                }
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
            }
        }

        Ok(())
    }

    /// Handle tick event - run queued input, refresh the board
    async fn handle_tick(&mut self) {
        if let Some(utterance) = self.app.pending_utterance.take() {
            self.process_utterance(&utterance).await;
            self.app.busy = false;
        }

        if self.last_refresh.elapsed() >= BOARD_REFRESH_INTERVAL {
            self.app.tasks = self.dispatcher.store().load();
            self.last_refresh = Instant::now();
        }
    }

    /// Classify one utterance, dispatch it and append the reply
    async fn process_utterance(&mut self, utterance: &str) {
        debug!("Processing utterance: {}", utterance);
        let intent = llm::classify(&self.llm, utterance).await;

        match self.dispatcher.dispatch(&intent) {
            Ok(reply) => {
                self.app.push_reply(&reply);
                self.app.tasks = self.dispatcher.store().load();
                self.last_refresh = Instant::now();
            }
            Err(e) => {
                self.app.push_assistant(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_refresh_interval() {
        assert_eq!(BOARD_REFRESH_INTERVAL, Duration::from_secs(1));
    }
}
