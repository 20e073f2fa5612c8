//! TUI event handling
//!
//! A dedicated thread polls crossterm and forwards key presses, resizes
//! and ticks over a tokio channel so the async main loop can await them.

use std::time::Duration;

use crossterm::event::{self, KeyEvent};
use eyre::Result;
use tokio::sync::mpsc;

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick (periodic refresh)
    Tick,
}

/// Bridges crossterm's blocking poll into an async channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Spawn the polling thread. A quiet period of `tick_rate` produces a
    /// tick, so the loop always wakes up to run queued work.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || poll_loop(tx, tick_rate));
        Self { rx }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

fn poll_loop(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration) {
    loop {
        let forwarded = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(event::Event::Key(key)) => Event::Key(key),
                Ok(event::Event::Resize(w, h)) => Event::Resize(w, h),
                // Mouse and focus events have no affordance in this layout
                Ok(_) | Err(_) => continue,
            },
            // Nothing pending within the tick window
            Ok(false) | Err(_) => Event::Tick,
        };

        // The receiver is gone once the runner exits
        if tx.send(forwarded).is_err() {
            break;
        }
    }
}
