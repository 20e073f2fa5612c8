//! TUI application - event handling and chat state
//!
//! The App struct owns the conversation, the input buffer and the board
//! snapshot. It does not do any rendering - that's delegated to the views
//! module - and it never talks to the store or the LLM itself; submitted
//! input is queued in `pending_utterance` for the runner to process.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskstore::Task;

use crate::dispatcher::Reply;

/// Who said a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One line of the conversation pane
#[derive(Debug, Clone)]
pub struct ChatLine {
    pub role: ChatRole,
    pub text: String,
}

/// TUI application
#[derive(Debug)]
pub struct App {
    /// Conversation history, oldest first
    pub messages: Vec<ChatLine>,
    /// Input buffer under the cursor
    pub input: String,
    /// Board snapshot rendered in the right pane
    pub tasks: Vec<Task>,
    /// Utterance submitted with Enter, waiting for the runner
    pub pending_utterance: Option<String>,
    /// A classification round-trip is in flight
    pub busy: bool,
    /// The main loop should stop after the next draw
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        let mut app = Self {
            messages: Vec::new(),
            input: String::new(),
            tasks: Vec::new(),
            pending_utterance: None,
            busy: false,
            should_quit: false,
        };
        app.push_assistant("Hi! Tell me about your tasks: add one, list them, complete or delete.");
        app
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit immediately.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                return true; // Force quit
            }
            (KeyCode::Esc, _) => {
                self.should_quit = true;
            }
            (KeyCode::Enter, _) => {
                self.submit_input();
            }
            (KeyCode::Backspace, _) => {
                self.input.pop();
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.input.push(c);
            }
            _ => {}
        }

        false
    }

    /// Queue the input buffer for the runner. Ignored while a round-trip
    /// is already in flight.
    fn submit_input(&mut self) {
        if self.busy {
            return;
        }

        let input = std::mem::take(&mut self.input);
        let utterance = input.trim();
        if utterance.is_empty() {
            return;
        }

        self.push_user(utterance);
        self.pending_utterance = Some(utterance.to_string());
        self.busy = true;
    }

    /// Append a reply to the conversation. Listing replies also spell out
    /// their tasks in the chat pane; the board shows everything regardless.
    pub fn push_reply(&mut self, reply: &Reply) {
        self.push_assistant(reply.text());
        match reply {
            Reply::Listing { .. } | Reply::Ambiguous { .. } => {
                for task in reply.tasks() {
                    self.push_assistant(format!("  {}", task_text(task)));
                }
            }
            _ => {}
        }
        if reply.is_exit() {
            self.should_quit = true;
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatLine {
            role: ChatRole::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatLine {
            role: ChatRole::Assistant,
            text: text.into(),
        });
    }

    /// Tasks still pending
    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed()).count()
    }

    /// Tasks already completed
    pub fn done_count(&self) -> usize {
        self.tasks.len() - self.open_count()
    }
}

/// One task as an unstyled chat line: status mark, title, short id, due note.
fn task_text(task: &Task) -> String {
    let mark = if task.is_completed() { "✓" } else { "○" };
    let mut line = format!("{mark} {} ({})", task.title, task.short_id());
    if let Some(due) = &task.due {
        line.push_str(&format!(" due: {due}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_app_new_greets() {
        let app = App::new();
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, ChatRole::Assistant);
        assert!(!app.busy);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_typing_edits_input() {
        let mut app = App::new();
        for c in "buy milk".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.input, "buy milk");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "buy mil");
    }

    #[test]
    fn test_enter_queues_utterance() {
        let mut app = App::new();
        for c in "add task: buy milk".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.pending_utterance.as_deref(), Some("add task: buy milk"));
        assert!(app.busy);
        assert!(app.input.is_empty());
        assert_eq!(app.messages.last().map(|m| m.role), Some(ChatRole::User));
    }

    #[test]
    fn test_enter_ignored_while_busy() {
        let mut app = App::new();
        app.busy = true;
        for c in "hello".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert!(app.pending_utterance.is_none());
        // The buffer is kept so nothing typed is lost
        assert_eq!(app.input, "hello");
    }

    #[test]
    fn test_enter_on_blank_input_is_noop() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.pending_utterance.is_none());
        assert!(!app.busy);
        assert_eq!(app.messages.len(), 1); // Only the greeting
    }

    #[test]
    fn test_esc_quits() {
        let mut app = App::new();
        assert!(!app.handle_key(key(KeyCode::Esc)));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let mut app = App::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(ctrl_c));
    }

    #[test]
    fn test_push_reply_exit_quits() {
        let mut app = App::new();
        app.push_reply(&Reply::Exit);
        assert!(app.should_quit);
        assert!(app.messages.last().is_some_and(|m| m.text.contains("Goodbye")));
    }

    #[test]
    fn test_push_reply_listing_spells_out_tasks() {
        let mut app = App::new();
        let tasks = vec![Task::new("Buy milk", None), Task::new("Walk dog", Some("today"))];
        app.push_reply(&Reply::Listing { tasks });

        let texts: Vec<&str> = app.messages.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.iter().any(|t| t.contains("Buy milk")));
        assert!(texts.iter().any(|t| t.contains("Walk dog") && t.contains("due: today")));
    }

    #[test]
    fn test_counts() {
        let mut app = App::new();
        let mut done = Task::new("Done", None);
        done.mark_completed();
        app.tasks = vec![Task::new("Open", None), done];

        assert_eq!(app.open_count(), 1);
        assert_eq!(app.done_count(), 1);
    }
}
