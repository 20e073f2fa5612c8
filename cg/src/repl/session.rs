//! REPL session management

use std::path::PathBuf;
use std::sync::Arc;

use colored::*;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use taskstore::Task;

use crate::dispatcher::{Dispatcher, Reply};
use crate::llm::{self, LlmClient};

/// Interactive chat session
pub struct ReplSession {
    llm: Arc<dyn LlmClient>,
    dispatcher: Dispatcher,
    tasks_file: PathBuf,
}

impl ReplSession {
    pub fn new(llm: Arc<dyn LlmClient>, dispatcher: Dispatcher, tasks_file: PathBuf) -> Self {
        Self {
            llm,
            dispatcher,
            tasks_file,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_utterance: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(utterance) = initial_utterance {
            println!("{} {}", ">".bright_green(), utterance);
            if self.process_utterance(&utterance).await {
                return Ok(());
            }
        }

        let mut rl =
            DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    // A bare farewell never goes through the classifier.
                    if is_farewell(input) {
                        println!("{}", Reply::Exit.text());
                        break;
                    }

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else if self.process_utterance(input).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    println!("{}", Reply::Exit.text());
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        Ok(())
    }

    /// Classify one utterance, dispatch it and render the reply. Returns
    /// true when the session should end.
    async fn process_utterance(&mut self, utterance: &str) -> bool {
        debug!("Processing utterance: {}", utterance);
        let intent = llm::classify(&self.llm, utterance).await;

        match self.dispatcher.dispatch(&intent) {
            Ok(reply) => {
                self.render_reply(&reply);
                reply.is_exit()
            }
            Err(e) => {
                println!("{} {:#}", "Error:".red(), e);
                println!();
                false
            }
        }
    }

    fn render_reply(&self, reply: &Reply) {
        println!("{}", reply.text());
        match reply {
            Reply::Listing { .. } | Reply::Ambiguous { .. } => {
                for task in reply.tasks() {
                    println!("  {}", render_task(task));
                }
            }
            _ => {}
        }
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Concierge".bright_cyan().bold());
        println!("Tasks file: {}", self.tasks_file.display());
        println!(
            "Tell me about your tasks in plain words. Try {} or {}.",
            "\"add task: buy milk\"".yellow(),
            "\"what's on my list?\"".yellow()
        );
        println!(
            "Type {} for commands, {} to leave",
            "/help".yellow(),
            "exit".yellow()
        );
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/tasks" | "/t" => {
                self.print_board();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => {
                println!("{}", Reply::Exit.text());
                SlashResult::Quit
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_board(&self) {
        let tasks = self.dispatcher.store().load();
        if tasks.is_empty() {
            println!("{}", "No tasks yet.".dimmed());
            println!();
            return;
        }

        let open = tasks.iter().filter(|t| !t.is_completed()).count();
        println!();
        println!(
            "{} {} open, {} done",
            "Tasks:".bright_cyan(),
            open,
            tasks.len() - open
        );
        for task in &tasks {
            println!("  {}", render_task(task));
        }
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Commands:".bright_cyan());
        println!("  {} Show this help", "/help".yellow());
        println!("  {} Show the task board", "/tasks".yellow());
        println!("  {} Leave the session", "/quit".yellow());
        println!();
        println!("{}", "Everything else is plain language:".bright_cyan());
        println!("  add task: call the dentist tomorrow");
        println!("  show my tasks");
        println!("  I finished the dentist one");
        println!("  delete the report task");
        println!();
    }
}

/// One task as a chat line: status mark, title, short id, due note.
pub fn render_task(task: &Task) -> String {
    let mark = if task.is_completed() {
        "✓".green()
    } else {
        "○".yellow()
    };
    let mut line = format!(
        "{mark} {} {}",
        task.title,
        format!("({})", task.short_id()).dimmed()
    );
    if let Some(due) = &task.due {
        line.push_str(&format!(" {}", format!("due: {due}").cyan()));
    }
    line
}

/// True for a bare `exit`/`quit`, which ends the session without an LLM
/// round-trip.
fn is_farewell(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

enum SlashResult {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    use taskstore::MemoryStore;

    use crate::llm::client::mock::MockLlmClient;

    fn session() -> ReplSession {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![]));
        let store = Arc::new(MemoryStore::new());
        ReplSession::new(llm, Dispatcher::new(store), PathBuf::from("/tmp/tasks.json"))
    }

    #[test]
    fn test_farewell_detection() {
        assert!(is_farewell("exit"));
        assert!(is_farewell("quit"));
        assert!(is_farewell("EXIT"));
        assert!(is_farewell("Quit"));
        assert!(!is_farewell("exit now"));
        assert!(!is_farewell("quite"));
        assert!(!is_farewell(""));
    }

    #[test]
    fn test_render_task_pending() {
        let task = Task::new("Buy milk", Some("friday"));
        let line = render_task(&task);
        assert!(line.contains("Buy milk"));
        assert!(line.contains(task.short_id()));
        assert!(line.contains("due: friday"));
    }

    #[test]
    fn test_render_task_completed_without_due() {
        let mut task = Task::new("Ship it", None);
        task.mark_completed();
        let line = render_task(&task);
        assert!(line.contains("Ship it"));
        assert!(!line.contains("due:"));
    }

    #[test]
    fn test_slash_quit_ends_session() {
        let mut s = session();
        assert!(matches!(s.handle_slash_command("/quit"), SlashResult::Quit));
        assert!(matches!(s.handle_slash_command("/q"), SlashResult::Quit));
        assert!(matches!(s.handle_slash_command("/exit"), SlashResult::Quit));
    }

    #[test]
    fn test_slash_help_and_unknown_continue() {
        let mut s = session();
        assert!(matches!(
            s.handle_slash_command("/help"),
            SlashResult::Continue
        ));
        assert!(matches!(
            s.handle_slash_command("/tasks"),
            SlashResult::Continue
        ));
        assert!(matches!(
            s.handle_slash_command("/bogus"),
            SlashResult::Continue
        ));
    }
}
