//! JSON import and export of task lists.
//!
//! Files hold a JSON array of task records. Imports are lenient about the
//! shape of each record, matching what the web and mobile clients accept:
//!
//! - missing or non-integer `id` gets the next free local id
//! - missing `text` becomes `""`
//! - `completed` (or `status`) is coerced to a boolean, missing means `false`
//! - missing `createdAt` is stamped with the current time

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::collection::TaskCollection;
use crate::ports::{Clock, FileSystem, NewTask};
use crate::task::{Task, TaskId};

/// Errors reading or writing task list files.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The file could not be read.
    #[error("failed to read {}: {message}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// The file could not be written.
    #[error("failed to write {}: {message}", path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// The file is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON document is not an array.
    #[error("file must contain an array of tasks")]
    NotAnArray,
    /// No id is left above the largest id in the file for a record without one.
    #[error("cannot assign an id above {0}")]
    IdsExhausted(i64),
}

/// Default export file name for the given day: `todo-list-YYYY-MM-DD.json`.
#[must_use]
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("todo-list-{}.json", now.format("%Y-%m-%d"))
}

/// Renders tasks as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(tasks: &[Task]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Writes `tasks` to `path` as JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn export(fs: &dyn FileSystem, path: &Path, tasks: &[Task]) -> Result<(), TransferError> {
    let json = to_json(tasks)?;
    fs.write(path, &json)
        .map_err(|e| TransferError::Write { path: path.to_path_buf(), message: e.to_string() })
}

/// Parses a task list document, normalizing each record.
///
/// Records sharing an id collapse into one (the last wins).
///
/// # Errors
///
/// Returns an error if `contents` is not JSON or not an array, or if a record
/// without an id follows the largest representable id.
pub fn parse(contents: &str, now: DateTime<Utc>) -> Result<Vec<Task>, TransferError> {
    let document: Value = serde_json::from_str(contents)?;
    let Value::Array(entries) = document else {
        return Err(TransferError::NotAnArray);
    };

    let max_id = entries.iter().filter_map(explicit_id).max().unwrap_or(0);
    let mut next_id = max_id.checked_add(1);
    let tasks = entries
        .iter()
        .map(|entry| {
            let id = match explicit_id(entry) {
                Some(id) => id,
                None => {
                    let id = next_id.ok_or(TransferError::IdsExhausted(max_id))?;
                    next_id = id.checked_add(1);
                    id
                }
            };
            Ok(normalize(entry, TaskId(id), now))
        })
        .collect::<Result<Vec<_>, TransferError>>()?;
    Ok(TaskCollection::from_tasks(tasks).to_vec())
}

/// Reads and parses the task list at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a task list.
pub fn import(
    fs: &dyn FileSystem,
    clock: &dyn Clock,
    path: &Path,
) -> Result<Vec<Task>, TransferError> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| TransferError::Read { path: path.to_path_buf(), message: e.to_string() })?;
    parse(&contents, clock.now())
}

/// Converts imported tasks into records the server accepts.
///
/// Returns the records and the number skipped for having blank text.
#[must_use]
pub fn to_new_tasks(tasks: &[Task]) -> (Vec<NewTask>, usize) {
    let new_tasks: Vec<NewTask> = tasks
        .iter()
        .filter(|task| !task.text.trim().is_empty())
        .map(|task| NewTask { text: task.text.trim().to_string(), completed: task.completed })
        .collect();
    let skipped = tasks.len() - new_tasks.len();
    (new_tasks, skipped)
}

fn explicit_id(entry: &Value) -> Option<i64> {
    entry.get("id").and_then(Value::as_i64).filter(|id| *id > 0)
}

fn normalize(entry: &Value, id: TaskId, now: DateTime<Utc>) -> Task {
    let text = match entry.get("text") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let completed = entry.get("completed").or_else(|| entry.get("status")).is_some_and(truthy);
    let created_at = timestamp(entry, "createdAt", "created_at").or(Some(now));
    let updated_at = timestamp(entry, "updatedAt", "updated_at");
    Task { id, text, completed, created_at, updated_at }
}

fn timestamp(entry: &Value, key: &str, alias: &str) -> Option<DateTime<Utc>> {
    entry
        .get(key)
        .or_else(|| entry.get(alias))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Boolean coercion for loosely typed flags: `null`, `false`, `0` and `""`
/// are false, everything else is true.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
