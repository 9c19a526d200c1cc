//! Ordered, id-unique collection of tasks.
//!
//! Holds at most one record per [`TaskId`]. Order is the order the server
//! (or the import file) delivered records in, with new records appended.

use serde::Serialize;

use crate::task::{Task, TaskId};

/// Ordered task list with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

/// Summary counts over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks not yet completed.
    pub pending: usize,
    /// Completed share in whole percent, rounded half up. Zero when empty.
    pub completion_rate: u32,
}

/// Differences between the local collection and a server snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Records present on the server only.
    pub added: Vec<Task>,
    /// Records present locally only.
    pub removed: Vec<Task>,
    /// Records present on both sides whose content differs (server version).
    pub changed: Vec<Task>,
}

impl SnapshotDiff {
    /// Returns `true` when the snapshot matched the local state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

impl TaskCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from `tasks`, keeping the last record for a repeated id
    /// at the position of its first occurrence.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(tasks);
        collection
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks.clear();
        for task in tasks {
            match self.position(task.id) {
                Some(index) => self.tasks[index] = task,
                None => self.tasks.push(task),
            }
        }
    }

    /// Returns the index of the record with `id`.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Returns the record with `id`.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Returns a mutable reference to the record with `id`.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Appends `task`. Returns `false` and leaves the collection untouched
    /// when a record with the same id already exists.
    pub fn push(&mut self, task: Task) -> bool {
        if self.position(task.id).is_some() {
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Replaces the record with the same id in place. Returns the old record,
    /// or `None` (and drops `task`) if no such record exists.
    pub fn replace(&mut self, task: Task) -> Option<Task> {
        let index = self.position(task.id)?;
        Some(std::mem::replace(&mut self.tasks[index], task))
    }

    /// Removes and returns the record with `id`.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    /// Iterates over records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns a copy of all records in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Computes summary counts.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        let completion_rate = if total == 0 {
            0
        } else {
            // Integer form of round(completed * 100 / total).
            u32::try_from((completed * 200 + total) / (total * 2)).unwrap_or(100)
        };
        Stats { total, completed, pending: total - completed, completion_rate }
    }

    /// Compares this collection against a server `snapshot`.
    #[must_use]
    pub fn diff(&self, snapshot: &[Task]) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();
        for remote in snapshot {
            match self.get(remote.id) {
                None => diff.added.push(remote.clone()),
                Some(local) if local != remote => diff.changed.push(remote.clone()),
                Some(_) => {}
            }
        }
        for local in &self.tasks {
            if !snapshot.iter().any(|remote| remote.id == local.id) {
                diff.removed.push(local.clone());
            }
        }
        diff
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
