//! Task record and identifier types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque task identifier.
///
/// Assigned by the remote service, or locally for task lists that have not
/// been synced yet (those ids are superseded on sync).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(TaskId).map_err(|e| format!("Invalid task id {s:?}: {e}"))
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier.
    pub id: TaskId,
    /// Display text. Never empty for records created through this crate.
    pub text: String,
    /// Completion flag. The server and the mobile client call this `status`.
    #[serde(alias = "status")]
    pub completed: bool,
    /// Creation time, display only.
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, display only.
    #[serde(default, alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task without timestamps.
    pub fn new(id: TaskId, text: impl Into<String>, completed: bool) -> Self {
        Self { id, text: text.into(), completed, created_at: None, updated_at: None }
    }
}

/// Trims `text` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`InvalidText`] when the trimmed text is empty.
pub fn normalize_text(text: &str) -> Result<String, InvalidText> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidText);
    }
    Ok(trimmed.to_string())
}

/// Task text was empty or whitespace only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task text must not be empty")]
pub struct InvalidText;
