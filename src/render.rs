//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use crate::collection::{SnapshotDiff, Stats};
use crate::controller::ChangeEvent;
use crate::task::Task;

/// One task as a single line: `[x] 3  buy milk`.
#[must_use]
pub fn format_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  {}", task.id, task.text)
}

/// One line per task, or a placeholder when there are none.
#[must_use]
pub fn format_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{}", format_task(task));
    }
    out.truncate(out.trim_end().len());
    out
}

/// Summary counts, one per line.
#[must_use]
pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Total: {}\nCompleted: {}\nPending: {}\nCompletion: {}%",
        stats.total, stats.completed, stats.pending, stats.completion_rate
    )
}

/// Changes picked up by a refresh, one line per record.
#[must_use]
pub fn format_diff(diff: &SnapshotDiff) -> String {
    let lines: Vec<String> = diff
        .added
        .iter()
        .map(|task| format!("+ {}", format_task(task)))
        .chain(diff.changed.iter().map(|task| format!("~ {}", format_task(task))))
        .chain(diff.removed.iter().map(|task| format!("- {}", format_task(task))))
        .collect();
    lines.join("\n")
}

/// Status line for an event worth telling the user about while a command runs.
#[must_use]
pub fn describe(event: &ChangeEvent) -> Option<String> {
    match event {
        ChangeEvent::Optimistic { task } => Some(format!("{} (saving...)", format_task(task))),
        ChangeEvent::Reconciled { task, anomaly: false } => Some(format_task(task)),
        ChangeEvent::Reconciled { task, anomaly: true } => {
            Some(format!("{} (server kept a different status)", format_task(task)))
        }
        ChangeEvent::RolledBack { task, error } => {
            Some(format!("{} (not saved: {error})", format_task(task)))
        }
        ChangeEvent::Refreshed { diff } => Some(format_diff(diff)),
        ChangeEvent::Loaded { .. }
        | ChangeEvent::Created { .. }
        | ChangeEvent::Updated { .. }
        | ChangeEvent::Deleted { .. } => None,
    }
}
