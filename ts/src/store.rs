//! Store implementations: a file-backed JSON store and an in-memory store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use eyre::{Context, Result};
use tracing::{debug, warn};

use crate::task::Task;

/// Load/save plus the reload-before-mutate operations built on them.
///
/// `load` never fails the caller: a missing or unreadable backing medium
/// reads as an empty store. Every provided operation re-reads the store
/// before touching it and rewrites it in full afterwards. Miss paths
/// (unknown id) perform no save at all.
pub trait TaskStore: Send + Sync {
    /// All tasks in insertion order.
    fn load(&self) -> Vec<Task>;

    /// Replace the store contents with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Append a new pending task and persist it.
    fn add(&self, title: &str, due: Option<&str>) -> Result<Task> {
        let mut tasks = self.load();
        let task = Task::new(title, due);
        tasks.push(task.clone());
        self.save(&tasks)?;
        Ok(task)
    }

    /// Complete the task with the given id. Returns `None` on miss, with no
    /// save. An already-completed task is returned as-is; its completion
    /// time never moves.
    fn complete(&self, id: &str) -> Result<Option<Task>> {
        let mut tasks = self.load();
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let changed = tasks[pos].mark_completed();
        let task = tasks[pos].clone();
        if changed {
            self.save(&tasks)?;
        }
        Ok(Some(task))
    }

    /// Remove the task with the given id. Returns `None` on miss, with no
    /// save.
    fn delete(&self, id: &str) -> Result<Option<Task>> {
        let mut tasks = self.load();
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = tasks.remove(pos);
        self.save(&tasks)?;
        Ok(Some(removed))
    }
}

/// File-backed store: one pretty-printed JSON array per store.
///
/// Saves write a sibling temp file and rename it over the target, so an
/// interrupted write leaves the previous contents intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `path`, creating parent directories as needed. The
    /// file itself is not created until the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
        }
        debug!(path = %path.display(), "opened task store");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Vec<Task> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "task store unreadable, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "task store corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks).context("Failed to serialize tasks")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write task store: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace task store: {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved task store");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Counts `save` calls so tests can assert that miss paths leave the
/// backing medium untouched.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<Task> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.lock().unwrap_or_else(|e| e.into_inner()) = tasks.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("tasks.json")).unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "this is not json {]").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/nested/tasks.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.add("first", None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_add_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let task = store.add("Buy milk", Some("tomorrow")).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.due.as_deref(), Some("tomorrow"));

        // A second handle on the same file sees the task: state lives on
        // disk, not in the handle.
        let other = store_in(&dir);
        let tasks = other.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0], task);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("one", None).unwrap();
        store.add("two", None).unwrap();
        store.add("three", None).unwrap();
        let titles: Vec<_> = store.load().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for i in 0..10 {
            store.add(&format!("task {i}"), None).unwrap();
        }
        let mut ids: Vec<_> = store.load().into_iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_complete_sets_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let task = store.add("Ship it", None).unwrap();

        let done = store.complete(&task.id).unwrap().unwrap();
        assert!(done.is_completed());
        assert!(done.completed_at.is_some());

        let on_disk = &store.load()[0];
        assert!(on_disk.is_completed());
    }

    #[test]
    fn test_complete_missing_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("only", None).unwrap();
        let before = fs::read(dir.path().join("tasks.json")).unwrap();

        assert!(store.complete("no-such-id").unwrap().is_none());

        let after = fs::read(dir.path().join("tasks.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_complete_twice_keeps_first_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let task = store.add("once", None).unwrap();

        let first = store.complete(&task.id).unwrap().unwrap();
        let second = store.complete(&task.id).unwrap().unwrap();
        assert_eq!(first.completed_at, second.completed_at);
    }

    #[test]
    fn test_delete_removes_and_returns() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let keep = store.add("keep", None).unwrap();
        let gone = store.add("drop", None).unwrap();

        let removed = store.delete(&gone.id).unwrap().unwrap();
        assert_eq!(removed.id, gone.id);

        let tasks = store.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, keep.id);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("only", None).unwrap();
        let before = fs::read(dir.path().join("tasks.json")).unwrap();

        assert!(store.delete("no-such-id").unwrap().is_none());

        let after = fs::read(dir.path().join("tasks.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add("old", None).unwrap();

        let replacement = vec![Task::new("new", None)];
        store.save(&replacement).unwrap();

        let tasks = store.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "new");
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryStore::new();
        store.add("a", None).unwrap();
        assert_eq!(store.save_count(), 1);

        // Misses never save.
        store.complete("nope").unwrap();
        store.delete("nope").unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_memory_store_with_tasks() {
        let seed = vec![Task::new("seeded", None)];
        let id = seed[0].id.clone();
        let store = MemoryStore::with_tasks(seed);

        assert_eq!(store.load().len(), 1);
        let done = store.complete(&id).unwrap().unwrap();
        assert!(done.is_completed());
        assert_eq!(store.save_count(), 1);
    }
}
