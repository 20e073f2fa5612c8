//! TaskStore - whole-file JSON persistence for task records
//!
//! One JSON document per store. The file is the single source of truth:
//! every operation re-reads it from disk before acting and rewrites it in
//! full after any mutation, so nothing is ever cached across calls. A
//! missing or unreadable file reads as an empty store. One interactive
//! writer per store file is assumed; there is no cross-process locking.
//!
//! # Modules
//!
//! - [`task`] - The `Task` record and its status lifecycle
//! - [`store`] - The `TaskStore` trait plus file-backed and in-memory stores
//! - [`cli`] - Argument parsing for the `ts` inspection binary

pub mod cli;
pub mod store;
pub mod task;

pub use store::{JsonFileStore, MemoryStore, TaskStore};
pub use task::{Task, TaskStatus};

use std::path::PathBuf;

/// Current unix time in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Default store location shared by `cg` and `ts`:
/// `{data_dir}/concierge/tasks.json`.
pub fn default_tasks_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("concierge")
        .join("tasks.json")
}
