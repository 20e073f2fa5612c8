//! Classified intents: the fixed vocabulary the classifier maps speech onto.
//!
//! Everything the language model sends back funnels through
//! [`ClassifiedIntent::from_classifier_output`], the single point where a
//! possibly-invalid payload becomes an always-valid intent. Unparseable
//! JSON, a missing or unknown `intent` string, wrongly-typed fields - all of
//! it collapses to the help fallback. The dispatcher never sees an invalid
//! intent.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The fixed intent vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AddTask,
    ListTasks,
    CompleteTask,
    DeleteTask,
    Help,
    Exit,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intent::AddTask => "add_task",
            Intent::ListTasks => "list_tasks",
            Intent::CompleteTask => "complete_task",
            Intent::DeleteTask => "delete_task",
            Intent::Help => "help",
            Intent::Exit => "exit",
        };
        write!(f, "{s}")
    }
}

/// One classified user turn. Transient: produced by normalization, consumed
/// by the dispatcher, then discarded.
///
/// Field strings are trimmed; empty or whitespace-only extractions are
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    pub task_title: Option<String>,
    pub task_due: Option<String>,
    pub task_id: Option<String>,
}

impl ClassifiedIntent {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            task_title: None,
            task_due: None,
            task_id: None,
        }
    }

    /// The intent substituted for anything the classifier got wrong.
    pub fn fallback() -> Self {
        Self::new(Intent::Help)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task_title = Some(title.into());
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.task_due = Some(due.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Normalize raw classifier text into a valid intent. Never fails.
    pub fn from_classifier_output(raw: &str) -> Self {
        match serde_json::from_str::<RawIntent>(raw.trim()) {
            Ok(parsed) => parsed.normalize(),
            Err(e) => {
                debug!(error = %e, "classifier output did not parse, using fallback");
                Self::fallback()
            }
        }
    }
}

/// Wire shape of the classifier payload, before normalization. Strict on
/// `intent` on purpose: an unrecognized intent string fails the parse and
/// lands on the same fallback as garbage output.
#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: Intent,
    #[serde(default)]
    task_title: Option<String>,
    #[serde(default)]
    task_due: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
}

impl RawIntent {
    fn normalize(self) -> ClassifiedIntent {
        ClassifiedIntent {
            intent: self.intent,
            task_title: clean(self.task_title),
            task_due: clean(self.task_due),
            task_id: clean(self.task_id),
        }
    }
}

fn clean(field: Option<String>) -> Option<String> {
    field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_parses() {
        let raw = r#"{"intent": "add_task", "task_title": "Buy milk", "task_due": "friday", "task_id": null}"#;
        let intent = ClassifiedIntent::from_classifier_output(raw);
        assert_eq!(intent.intent, Intent::AddTask);
        assert_eq!(intent.task_title.as_deref(), Some("Buy milk"));
        assert_eq!(intent.task_due.as_deref(), Some("friday"));
        assert!(intent.task_id.is_none());
    }

    #[test]
    fn test_missing_optional_fields_are_none() {
        let intent = ClassifiedIntent::from_classifier_output(r#"{"intent": "list_tasks"}"#);
        assert_eq!(intent.intent, Intent::ListTasks);
        assert!(intent.task_title.is_none());
        assert!(intent.task_due.is_none());
        assert!(intent.task_id.is_none());
    }

    #[test]
    fn test_unknown_intent_falls_back_to_help() {
        let intent = ClassifiedIntent::from_classifier_output(r#"{"intent": "reticulate_splines"}"#);
        assert_eq!(intent, ClassifiedIntent::fallback());
    }

    #[test]
    fn test_missing_intent_falls_back_to_help() {
        let intent = ClassifiedIntent::from_classifier_output(r#"{"task_title": "orphan"}"#);
        assert_eq!(intent, ClassifiedIntent::fallback());
    }

    #[test]
    fn test_garbage_falls_back_to_help() {
        for raw in ["", "not json at all", "{\"intent\":", "[1, 2, 3]"] {
            assert_eq!(ClassifiedIntent::from_classifier_output(raw), ClassifiedIntent::fallback());
        }
    }

    #[test]
    fn test_wrongly_typed_field_falls_back_to_help() {
        let intent = ClassifiedIntent::from_classifier_output(r#"{"intent": "add_task", "task_title": 42}"#);
        assert_eq!(intent, ClassifiedIntent::fallback());
    }

    #[test]
    fn test_whitespace_fields_normalize_to_none() {
        let raw = r#"{"intent": "complete_task", "task_title": "   ", "task_id": ""}"#;
        let intent = ClassifiedIntent::from_classifier_output(raw);
        assert_eq!(intent.intent, Intent::CompleteTask);
        assert!(intent.task_title.is_none());
        assert!(intent.task_id.is_none());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let raw = r#"{"intent": "add_task", "task_title": "  Buy milk  "}"#;
        let intent = ClassifiedIntent::from_classifier_output(raw);
        assert_eq!(intent.task_title.as_deref(), Some("Buy milk"));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let intent = ClassifiedIntent::from_classifier_output("\n  {\"intent\": \"exit\"}  \n");
        assert_eq!(intent.intent, Intent::Exit);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let raw = r#"{"intent": "help", "confidence": 0.93}"#;
        assert_eq!(ClassifiedIntent::from_classifier_output(raw).intent, Intent::Help);
    }

    #[test]
    fn test_fallback_is_help_with_no_fields() {
        let fb = ClassifiedIntent::fallback();
        assert_eq!(fb.intent, Intent::Help);
        assert!(fb.task_title.is_none() && fb.task_due.is_none() && fb.task_id.is_none());
    }

    #[test]
    fn test_intent_display_matches_wire_names() {
        assert_eq!(Intent::AddTask.to_string(), "add_task");
        assert_eq!(Intent::Exit.to_string(), "exit");
    }
}
