//! In-memory test doubles for the ports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::remote::{
    ListQuery, NewTask, RemoteError, RemoteFuture, SortKey, StatusFilter, TaskService,
};
use crate::task::{Task, TaskId};

/// In-memory stand-in for the to-do server.
///
/// Records every call as a short string. `fail_with` makes every later call
/// fail until `recover`.
pub struct MemTaskService {
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<RemoteError>>,
    method_failure: Mutex<Option<(String, RemoteError)>>,
    toggle_response: Mutex<Option<Task>>,
}

impl MemTaskService {
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            method_failure: Mutex::new(None),
            toggle_response: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, error: RemoteError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
        *self.method_failure.lock().unwrap() = None;
    }

    /// Makes only calls to `method` fail; other methods keep working.
    pub fn fail_calls_to(&self, method: &str, error: RemoteError) {
        *self.method_failure.lock().unwrap() = Some((method.to_string(), error));
    }

    /// Makes `set_completion` answer with `task` regardless of the request.
    pub fn respond_to_toggle_with(&self, task: Task) {
        *self.toggle_response.lock().unwrap() = Some(task);
    }

    pub fn insert(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, description: String) -> Result<(), RemoteError> {
        let method = description.split(' ').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(description);
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        match self.method_failure.lock().unwrap().clone() {
            Some((failing, error)) if failing == method => Err(error),
            _ => Ok(()),
        }
    }

    fn next_id(tasks: &[Task]) -> TaskId {
        TaskId(tasks.iter().map(|task| task.id.0).max().unwrap_or(0) + 1)
    }

    fn not_found() -> RemoteError {
        RemoteError::Status { status: 404, message: "Not Found".into() }
    }

    fn list(&self, query: ListQuery) -> Result<Vec<Task>, RemoteError> {
        self.call("list_tasks".into())?;
        let mut tasks: Vec<Task> = self
            .tasks()
            .into_iter()
            .filter(|task| match query.status {
                StatusFilter::All => true,
                StatusFilter::Completed => task.completed,
                StatusFilter::Pending => !task.completed,
            })
            .collect();
        match query.sort {
            SortKey::Id => tasks.sort_by_key(|task| task.id),
            SortKey::Text => tasks.sort_by(|a, b| a.text.cmp(&b.text)),
            SortKey::Status => tasks.sort_by(|a, b| b.completed.cmp(&a.completed)),
        }
        Ok(tasks)
    }

    fn create(&self, text: &str, completed: bool) -> Result<Task, RemoteError> {
        self.call(format!("create_task {text}"))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = Task::new(Self::next_id(&tasks), text, completed);
        tasks.push(task.clone());
        Ok(task)
    }

    fn update(&self, id: TaskId, text: &str) -> Result<Task, RemoteError> {
        self.call(format!("update_text {id} {text}"))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.iter_mut().find(|task| task.id == id).ok_or_else(Self::not_found)?;
        task.text = text.to_string();
        Ok(task.clone())
    }

    fn complete(&self, id: TaskId, completed: bool) -> Result<Task, RemoteError> {
        self.call(format!("set_completion {id} {completed}"))?;
        if let Some(task) = self.toggle_response.lock().unwrap().clone() {
            return Ok(task);
        }
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.iter_mut().find(|task| task.id == id).ok_or_else(Self::not_found)?;
        task.completed = completed;
        Ok(task.clone())
    }

    fn delete(&self, id: TaskId) -> Result<(), RemoteError> {
        self.call(format!("delete_task {id}"))?;
        let mut tasks = self.tasks.lock().unwrap();
        let index = tasks.iter().position(|task| task.id == id).ok_or_else(Self::not_found)?;
        tasks.remove(index);
        Ok(())
    }

    fn replace(&self, new_tasks: &[NewTask]) -> Result<Vec<Task>, RemoteError> {
        self.call(format!("replace_all {}", new_tasks.len()))?;
        let created: Vec<Task> = new_tasks
            .iter()
            .zip(1..)
            .map(|(new, id)| Task::new(TaskId(id), new.text.clone(), new.completed))
            .collect();
        *self.tasks.lock().unwrap() = created.clone();
        Ok(created)
    }
}

impl TaskService for MemTaskService {
    fn list_tasks(&self, query: ListQuery) -> RemoteFuture<'_, Vec<Task>> {
        let result = self.list(query);
        Box::pin(async move { result })
    }

    fn create_task(&self, text: &str, completed: bool) -> RemoteFuture<'_, Task> {
        let result = self.create(text, completed);
        Box::pin(async move { result })
    }

    fn update_text(&self, id: TaskId, text: &str) -> RemoteFuture<'_, Task> {
        let result = self.update(id, text);
        Box::pin(async move { result })
    }

    fn set_completion(&self, id: TaskId, completed: bool) -> RemoteFuture<'_, Task> {
        let result = self.complete(id, completed);
        Box::pin(async move { result })
    }

    fn delete_task(&self, id: TaskId) -> RemoteFuture<'_, ()> {
        let result = self.delete(id);
        Box::pin(async move { result })
    }

    fn replace_all(&self, tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>> {
        let result = self.replace(tasks);
        Box::pin(async move { result })
    }
}

/// Holds the first call to each gated method open until the test releases it.
///
/// A gate signals `called` once its call is issued, then answers with
/// whatever is sent on its release channel. Ungated calls go to `inner`.
pub struct GatedTaskService {
    inner: MemTaskService,
    gates: Mutex<HashMap<&'static str, Gate>>,
}

struct Gate {
    called: oneshot::Sender<()>,
    release: oneshot::Receiver<Result<Task, RemoteError>>,
}

impl GatedTaskService {
    /// Gates the first `set_completion` call.
    pub fn new(
        inner: MemTaskService,
        called: oneshot::Sender<()>,
        release: oneshot::Receiver<Result<Task, RemoteError>>,
    ) -> Self {
        Self { inner, gates: Mutex::new(HashMap::new()) }.gate("set_completion", called, release)
    }

    /// Also gates the first call to `method` (`set_completion` or `update_text`).
    pub fn gate(
        self,
        method: &'static str,
        called: oneshot::Sender<()>,
        release: oneshot::Receiver<Result<Task, RemoteError>>,
    ) -> Self {
        self.gates.lock().unwrap().insert(method, Gate { called, release });
        self
    }

    fn take_gate(&self, method: &str) -> Option<Gate> {
        self.gates.lock().unwrap().remove(method)
    }
}

fn gated(gate: Gate) -> RemoteFuture<'static, Task> {
    Box::pin(async move {
        let _ = gate.called.send(());
        gate.release.await.unwrap_or_else(|_| Err(RemoteError::Transport("gate dropped".into())))
    })
}

impl TaskService for GatedTaskService {
    fn list_tasks(&self, query: ListQuery) -> RemoteFuture<'_, Vec<Task>> {
        self.inner.list_tasks(query)
    }

    fn create_task(&self, text: &str, completed: bool) -> RemoteFuture<'_, Task> {
        self.inner.create_task(text, completed)
    }

    fn update_text(&self, id: TaskId, text: &str) -> RemoteFuture<'_, Task> {
        match self.take_gate("update_text") {
            Some(gate) => gated(gate),
            None => self.inner.update_text(id, text),
        }
    }

    fn set_completion(&self, id: TaskId, completed: bool) -> RemoteFuture<'_, Task> {
        match self.take_gate("set_completion") {
            Some(gate) => gated(gate),
            None => self.inner.set_completion(id, completed),
        }
    }

    fn delete_task(&self, id: TaskId) -> RemoteFuture<'_, ()> {
        self.inner.delete_task(id)
    }

    fn replace_all(&self, tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>> {
        self.inner.replace_all(tasks)
    }
}

/// Clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(rfc3339: &str) -> Self {
        Self(rfc3339.parse().unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory filesystem keyed by path.
pub struct MemFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFileSystem {
    pub fn new() -> Self {
        Self { files: Mutex::new(HashMap::new()) }
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path).ok_or_else(|| format!("{}: No such file", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.insert(path, contents);
        Ok(())
    }
}
