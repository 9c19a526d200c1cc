//! Remote task service port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Boxed future type alias used by [`TaskService`] to keep the trait dyn-compatible.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// Failure of a remote call.
///
/// The controller only distinguishes success from failure; the variants
/// exist for messages and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RemoteError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Completion filter for [`TaskService::list_tasks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Completed tasks only.
    Completed,
    /// Tasks not yet completed.
    Pending,
}

/// Server-side sort order for [`TaskService::list_tasks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending id (creation order).
    #[default]
    Id,
    /// Ascending text.
    Text,
    /// Completed first.
    Status,
}

/// Parameters for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Completion filter.
    pub status: StatusFilter,
    /// Sort order.
    pub sort: SortKey,
}

/// A record to create through [`TaskService::replace_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Display text.
    pub text: String,
    /// Initial completion flag.
    pub completed: bool,
}

/// The remote to-do service.
///
/// Every method returns the server's view of the affected record(s); the
/// caller treats that view as authoritative.
pub trait TaskService: Send + Sync {
    /// Lists tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn list_tasks(&self, query: ListQuery) -> RemoteFuture<'_, Vec<Task>>;

    /// Creates a task and returns it with its server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the task or the request fails.
    fn create_task(&self, text: &str, completed: bool) -> RemoteFuture<'_, Task>;

    /// Replaces the text of task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the request fails.
    fn update_text(&self, id: TaskId, text: &str) -> RemoteFuture<'_, Task>;

    /// Sets the completion flag of task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the request fails.
    fn set_completion(&self, id: TaskId, completed: bool) -> RemoteFuture<'_, Task>;

    /// Deletes task `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the request fails.
    fn delete_task(&self, id: TaskId) -> RemoteFuture<'_, ()>;

    /// Replaces every task on the server with `tasks` and returns the new records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn replace_all(&self, tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>>;
}
