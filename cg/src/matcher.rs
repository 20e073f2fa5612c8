//! Title-fragment matching: how a spoken phrase finds its task.

use taskstore::Task;

/// Case-insensitive substring match of `fragment` against each title,
/// preserving store order. No ranking, no fuzziness: containment or nothing.
///
/// An empty fragment matches every task, so callers gate on fragment
/// presence before calling (the dispatcher does).
pub fn find_by_title_fragment(tasks: &[Task], fragment: &str) -> Vec<Task> {
    let needle = fragment.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
