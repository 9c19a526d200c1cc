//! Replaying adapter for the `TaskService` port.

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use super::{next_output, split_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::remote::{ListQuery, NewTask, RemoteError, RemoteFuture, TaskService};
use crate::task::{Task, TaskId};

/// Serves recorded server responses in call order.
///
/// Arguments are not matched against the recording. A call the cassette
/// has no (more) entries for fails with [`RemoteError::Transport`].
pub struct ReplayingTaskService {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskService {
    /// Creates a replaying service from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T: DeserializeOwned + Send + 'static>(&self, method: &str) -> RemoteFuture<'_, T> {
        let result = next_output(&self.replayer, "remote", method)
            .map_err(RemoteError::Transport)
            .and_then(|output| decode(method, output));
        Box::pin(async move { result })
    }
}

fn decode<T: DeserializeOwned>(method: &str, output: serde_json::Value) -> Result<T, RemoteError> {
    match split_result(output) {
        Ok(value) => serde_json::from_value(value)
            .map_err(|e| RemoteError::Malformed(format!("remote::{method}: {e}"))),
        Err(err) => Err(serde_json::from_value::<RemoteError>(err.clone()).unwrap_or_else(|_| {
            RemoteError::Transport(err.as_str().map_or_else(|| err.to_string(), String::from))
        })),
    }
}

impl TaskService for ReplayingTaskService {
    fn list_tasks(&self, _query: ListQuery) -> RemoteFuture<'_, Vec<Task>> {
        self.replay("list_tasks")
    }

    fn create_task(&self, _text: &str, _completed: bool) -> RemoteFuture<'_, Task> {
        self.replay("create_task")
    }

    fn update_text(&self, _id: TaskId, _text: &str) -> RemoteFuture<'_, Task> {
        self.replay("update_text")
    }

    fn set_completion(&self, _id: TaskId, _completed: bool) -> RemoteFuture<'_, Task> {
        self.replay("set_completion")
    }

    fn delete_task(&self, _id: TaskId) -> RemoteFuture<'_, ()> {
        self.replay("delete_task")
    }

    fn replace_all(&self, _tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>> {
        self.replay("replace_all")
    }
}
