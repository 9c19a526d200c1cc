//! Recording adapter for the `TaskService` port.

use serde::Serialize;

use super::record_typed_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::remote::{ListQuery, NewTask, RemoteFuture, TaskService};
use crate::task::{Task, TaskId};

/// Records every remote call and its outcome while delegating to `inner`.
pub struct RecordingTaskService {
    inner: Box<dyn TaskService>,
    recorder: SharedRecorder,
}

impl RecordingTaskService {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn TaskService>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }

    /// Awaits `call` and records its result under `method`.
    fn recorded<'a, T, I>(
        &'a self,
        method: &'static str,
        input: I,
        call: RemoteFuture<'a, T>,
    ) -> RemoteFuture<'a, T>
    where
        T: Serialize + Send + 'a,
        I: Serialize + Send + 'a,
    {
        Box::pin(async move {
            let result = call.await;
            record_typed_result(&self.recorder, "remote", method, &input, &result);
            result
        })
    }
}

#[derive(Serialize)]
struct IdInput {
    id: TaskId,
}

#[derive(Serialize)]
struct TextInput {
    id: Option<TaskId>,
    text: String,
    completed: Option<bool>,
}

#[derive(Serialize)]
struct CompletionInput {
    id: TaskId,
    completed: bool,
}

impl TaskService for RecordingTaskService {
    fn list_tasks(&self, query: ListQuery) -> RemoteFuture<'_, Vec<Task>> {
        self.recorded("list_tasks", query, self.inner.list_tasks(query))
    }

    fn create_task(&self, text: &str, completed: bool) -> RemoteFuture<'_, Task> {
        let input = TextInput { id: None, text: text.to_string(), completed: Some(completed) };
        self.recorded("create_task", input, self.inner.create_task(text, completed))
    }

    fn update_text(&self, id: TaskId, text: &str) -> RemoteFuture<'_, Task> {
        let input = TextInput { id: Some(id), text: text.to_string(), completed: None };
        self.recorded("update_text", input, self.inner.update_text(id, text))
    }

    fn set_completion(&self, id: TaskId, completed: bool) -> RemoteFuture<'_, Task> {
        let input = CompletionInput { id, completed };
        self.recorded("set_completion", input, self.inner.set_completion(id, completed))
    }

    fn delete_task(&self, id: TaskId) -> RemoteFuture<'_, ()> {
        self.recorded("delete_task", IdInput { id }, self.inner.delete_task(id))
    }

    fn replace_all(&self, tasks: &[NewTask]) -> RemoteFuture<'_, Vec<Task>> {
        self.recorded("replace_all", tasks.to_vec(), self.inner.replace_all(tasks))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use crate::ports::remote::RemoteError;
    use crate::testing::MemTaskService;

    #[tokio::test]
    async fn records_successes_and_failures() {
        let dir = std::env::temp_dir().join("tickit_rec_remote_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("remote.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "mem")));

        {
            let inner = MemTaskService::with_tasks(vec![Task::new(TaskId(1), "x", false)]);
            let service = RecordingTaskService::new(Box::new(inner), Arc::clone(&recorder));
            service.set_completion(TaskId(1), true).await.unwrap();
            assert!(service.delete_task(TaskId(9)).await.is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let cassette: crate::cassette::format::Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(cassette.interactions.len(), 2);
        let toggle = &cassette.interactions[0];
        assert_eq!(toggle.method, "set_completion");
        assert_eq!(toggle.input, serde_json::json!({"id": 1, "completed": true}));
        assert_eq!(toggle.output["ok"]["completed"], true);

        let err: RemoteError =
            serde_json::from_value(cassette.interactions[1].output["err"].clone()).unwrap();
        assert!(matches!(err, RemoteError::Status { status: 404, .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
