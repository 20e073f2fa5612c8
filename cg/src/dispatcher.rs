//! The intent dispatcher: one classified intent in, one store mutation (at
//! most) and one reply out.
//!
//! Resolution policy for complete/delete: an explicit `task_id` wins
//! outright and the title is ignored. A title fragment goes through the
//! matcher; zero hits is "not found", exactly one hit mutates, more than one
//! hit reports the candidates and mutates nothing. The dispatcher holds no
//! state of its own - every call re-reads the store through the handle it
//! was given.

use std::sync::Arc;

use eyre::Result;
use serde::Serialize;
use tracing::debug;

use taskstore::{Task, TaskStore};

use crate::intent::{ClassifiedIntent, Intent};
use crate::matcher;

/// Which mutation a target reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAction {
    Complete,
    Delete,
}

impl std::fmt::Display for TargetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetAction::Complete => write!(f, "complete"),
            TargetAction::Delete => write!(f, "delete"),
        }
    }
}

/// The response descriptor handed to every presentation layer.
///
/// `text()` owns the user-facing wording so the REPL, the TUI and one-shot
/// output all say the same thing; `tasks()` carries any records involved so
/// renderers can show them their own way.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Added { task: Task },
    Listing { tasks: Vec<Task> },
    Completed { task: Task },
    Deleted { task: Task },
    NotFound,
    Ambiguous { action: TargetAction, matches: Vec<Task> },
    MissingTitle,
    MissingTarget { action: TargetAction },
    Help,
    Exit,
}

impl Reply {
    /// The sentence shown to the user.
    pub fn text(&self) -> String {
        match self {
            Reply::Added { task } => match &task.due {
                Some(due) => format!("Added: \"{}\" (due: {due})", task.title),
                None => format!("Added: \"{}\"", task.title),
            },
            Reply::Listing { tasks } if tasks.is_empty() => {
                "No tasks yet. Add one to get started.".to_string()
            }
            Reply::Listing { .. } => "Your tasks:".to_string(),
            Reply::Completed { task } => format!("Marked as completed: \"{}\"", task.title),
            Reply::Deleted { task } => format!("Deleted: \"{}\"", task.title),
            Reply::NotFound => "I couldn't find a matching task.".to_string(),
            Reply::Ambiguous { .. } => {
                "That matches more than one task. Be more specific:".to_string()
            }
            Reply::MissingTitle => {
                "I didn't catch what the task should be. Try: add task: submit the report by friday".to_string()
            }
            Reply::MissingTarget { action: TargetAction::Complete } => {
                "Which task did you complete? Mention a few words from its title.".to_string()
            }
            Reply::MissingTarget { action: TargetAction::Delete } => {
                "Which task should I delete? Mention a few words from its title.".to_string()
            }
            Reply::Help => concat!(
                "I keep track of your tasks. Try:\n",
                "  - add task: submit the report by friday\n",
                "  - show my tasks\n",
                "  - i finished the report\n",
                "  - delete the gym task\n",
                "Say 'exit' when you're done."
            )
            .to_string(),
            Reply::Exit => "Goodbye. Your tasks are saved.".to_string(),
        }
    }

    /// Tasks involved in this reply, for renderers that list them.
    pub fn tasks(&self) -> &[Task] {
        match self {
            Reply::Added { task } | Reply::Completed { task } | Reply::Deleted { task } => {
                std::slice::from_ref(task)
            }
            Reply::Listing { tasks } | Reply::Ambiguous { matches: tasks, .. } => tasks,
            _ => &[],
        }
    }

    /// Whether the interaction loop should end after rendering this reply.
    pub fn is_exit(&self) -> bool {
        matches!(self, Reply::Exit)
    }
}

/// Maps classified intents onto the task store.
pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// The store handle, for presentations that render the full board.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Resolve one intent. At most one store mutation per call; every
    /// outcome, including the miss and ambiguity paths, is an ordinary
    /// `Reply`. The only error out of here is a failed store write.
    pub fn dispatch(&self, intent: &ClassifiedIntent) -> Result<Reply> {
        debug!(intent = %intent.intent, "dispatch: called");
        match intent.intent {
            Intent::AddTask => self.add_task(intent),
            Intent::ListTasks => Ok(Reply::Listing { tasks: self.store.load() }),
            Intent::CompleteTask => self.resolve_target(TargetAction::Complete, intent),
            Intent::DeleteTask => self.resolve_target(TargetAction::Delete, intent),
            Intent::Help => Ok(Reply::Help),
            Intent::Exit => Ok(Reply::Exit),
        }
    }

    fn add_task(&self, intent: &ClassifiedIntent) -> Result<Reply> {
        let Some(title) = intent.task_title.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Reply::MissingTitle);
        };
        let task = self.store.add(title, intent.task_due.as_deref())?;
        debug!(id = %task.id, "dispatch: task added");
        Ok(Reply::Added { task })
    }

    fn resolve_target(&self, action: TargetAction, intent: &ClassifiedIntent) -> Result<Reply> {
        // An explicit id is never second-guessed by a title match.
        if let Some(id) = intent.task_id.as_deref() {
            return match self.apply(action, id)? {
                Some(task) => Ok(self.done(action, task)),
                None => Ok(Reply::NotFound),
            };
        }

        let Some(fragment) = intent.task_title.as_deref() else {
            return Ok(Reply::MissingTarget { action });
        };

        let matches = matcher::find_by_title_fragment(&self.store.load(), fragment);
        match matches.len() {
            0 => Ok(Reply::NotFound),
            1 => match self.apply(action, &matches[0].id)? {
                Some(task) => Ok(self.done(action, task)),
                None => Ok(Reply::NotFound),
            },
            _ => {
                debug!(count = matches.len(), %action, "dispatch: ambiguous title match");
                Ok(Reply::Ambiguous { action, matches })
            }
        }
    }

    fn apply(&self, action: TargetAction, id: &str) -> Result<Option<Task>> {
        match action {
            TargetAction::Complete => self.store.complete(id),
            TargetAction::Delete => self.store.delete(id),
        }
    }

    fn done(&self, action: TargetAction, task: Task) -> Reply {
        match action {
            TargetAction::Complete => Reply::Completed { task },
            TargetAction::Delete => Reply::Deleted { task },
        }
    }
}
