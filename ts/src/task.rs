//! The `Task` record: the sole entity in the system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::now_ms;

/// Lifecycle status of a task. The transition is one-way: a task starts
/// pending and becomes completed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A single task record.
///
/// `id` and `created_at` are fixed at creation. `due` is an opaque free-form
/// note, never parsed or validated. `completed_at` is set by the first
/// completion and never moves afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub due: Option<String>,
    pub status: TaskStatus,
    pub created_at: i64,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create a pending task with a fresh UUIDv7 id and the current time.
    /// Callers are expected to pass a non-empty title.
    pub fn new(title: impl Into<String>, due: Option<&str>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            due: due.map(str::to_string),
            status: TaskStatus::Pending,
            created_at: now_ms(),
            completed_at: None,
        }
    }

    /// Prefix of the id shown in listings. Ids are opaque strings, so the
    /// cut backs off to the nearest char boundary rather than assuming
    /// ASCII.
    pub fn short_id(&self) -> &str {
        let mut end = self.id.len().min(8);
        while !self.id.is_char_boundary(end) {
            end -= 1;
        }
        &self.id[..end]
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Transition to completed. Returns false and changes nothing when the
    /// task is already completed, keeping the original completion time.
    pub fn mark_completed(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now_ms());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("Buy milk", None);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
        assert!(task.created_at > 0);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_new_tasks_get_distinct_ids() {
        let a = Task::new("a", None);
        let b = Task::new("b", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_due_is_kept_verbatim() {
        let task = Task::new("Call mom", Some("  sometime next week  "));
        assert_eq!(task.due.as_deref(), Some("  sometime next week  "));
    }

    #[test]
    fn test_mark_completed_sets_timestamp_once() {
        let mut task = Task::new("Ship it", None);
        assert!(task.mark_completed());
        let first = task.completed_at;
        assert!(first.is_some());

        assert!(!task.mark_completed());
        assert_eq!(task.completed_at, first);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_short_id_is_prefix() {
        let task = Task::new("x", None);
        assert_eq!(task.short_id().len(), 8);
        assert!(task.id.starts_with(task.short_id()));
    }

    #[test]
    fn test_short_id_clips_multibyte_ids_on_char_boundary() {
        // A hand-edited store can carry any string as an id; 9 bytes of
        // euro signs has no char boundary at byte 8.
        let json = r#"{"id":"€€€","title":"t","status":"pending","created_at":5}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.short_id(), "€€");
        assert!(task.id.starts_with(task.short_id()));
    }

    #[test]
    fn test_short_id_of_tiny_id_is_whole_id() {
        let json = r#"{"id":"ab","title":"t","status":"pending","created_at":5}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.short_id(), "ab");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&TaskStatus::Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let json = r#"{"id":"abc","title":"t","status":"pending","created_at":5}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.due.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }
}
