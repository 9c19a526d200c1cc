//! Live adapter for the `TaskService` port over the to-do REST API.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::remote::{
    ListQuery, NewTask, RemoteError, RemoteFuture, SortKey, StatusFilter, TaskService,
};
use crate::task::{Task, TaskId};

/// Task service backed by the REST API rooted at `base_url` (e.g. `http://localhost:5000/api`).
pub struct HttpTaskService {
    client: Client,
    base_url: String,
}

impl HttpTaskService {
    /// Creates a client for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Body of create and bulk-replace requests. The server calls the flag `status`.
#[derive(Serialize)]
struct TaskBody<'a> {
    text: &'a str,
    status: bool,
}

/// Body of a text update.
#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

/// Envelope returned by the bulk-replace endpoint.
#[derive(Deserialize)]
struct BulkResponse {
    todos: Vec<Task>,
}

/// Error body returned by the server (`{"error": "..."}`).
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

/// Query-string pairs for a list request.
fn query_pairs(query: ListQuery) -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::new();
    match query.status {
        StatusFilter::All => {}
        StatusFilter::Completed => pairs.push(("status", "true")),
        StatusFilter::Pending => pairs.push(("status", "false")),
    }
    let sort = match query.sort {
        SortKey::Id => "id",
        SortKey::Text => "text",
        SortKey::Status => "status",
    };
    pairs.push(("sort_by", sort));
    pairs
}

/// Pulls a readable message out of an error response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_string(), |e| e.error)
}

/// Sends `request` and decodes a JSON body on success.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    let response = request.send().await.map_err(|e| RemoteError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| RemoteError::Transport(e.to_string()))?;
    debug!(status = status.as_u16(), bytes = body.len(), "api response");

    if !status.is_success() {
        return Err(RemoteError::Status { status: status.as_u16(), message: error_message(&body) });
    }
    serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))
}

impl TaskService for HttpTaskService {
    fn list_tasks(&self, query: ListQuery) -> RemoteFuture<'_, Vec<Task>> {
        let request = self.client.get(self.url("/todos")).query(&query_pairs(query));
        Box::pin(send(request))
    }

    fn create_task(&self, text: &str, completed: bool) -> RemoteFuture<'_, Task> {
        let request =
            self.client.post(self.url("/todos")).json(&TaskBody { text, status: completed });
        Box::pin(send(request))
    }

    fn update_text(&self, id: TaskId, text: &str) -> RemoteFuture<'_, Task> {
        let request = self.client.put(self.url(&format!("/todos/{id}"))).json(&TextBody { text });
        Box::pin(send(request))
    }

    fn set_completion(&self, id: TaskId, completed: bool) -> RemoteFuture<'_, Task> {
        let action = if completed { "complete" } else { "uncomplete" };
        let request = self.client.patch(self.url(&format!("/todos/{id}/{action}")));
        Box::pin(send(request))
    }

    fn delete_task(&self, id: TaskId) -> RemoteFuture<'_, ()> {
        let request = self.client.delete(self.url(&format!("/todos/{id}")));
        Box::pin(async move {
            send::<serde_json::Value>(request).await?;
            Ok(())
        })
    }

    fn replace_all(&self, tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>> {
        let body: Vec<TaskBody<'_>> =
            tasks.iter().map(|task| TaskBody { text: &task.text, status: task.completed }).collect();
        let request = self.client.post(self.url("/todos/bulk")).json(&body);
        Box::pin(async move {
            let response: BulkResponse = send(request).await?;
            Ok(response.todos)
        })
    }
}
