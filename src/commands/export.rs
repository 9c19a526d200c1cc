//! `tickit export` command.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::transfer;

/// Writes every task to `path`, or to `todo-list-YYYY-MM-DD.json` in the
/// current directory.
///
/// # Errors
///
/// Returns an error string if the server cannot be reached or the file
/// cannot be written.
pub async fn run(ctx: &ServiceContext, path: Option<&Path>) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    let tasks = controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;

    let path = path.map_or_else(
        || PathBuf::from(transfer::default_file_name(ctx.clock.now())),
        Path::to_path_buf,
    );
    transfer::export(ctx.fs.as_ref(), &path, &tasks).map_err(|e| e.to_string())?;
    Ok(format!("Exported {} tasks to {}", tasks.len(), path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use crate::testing::{FixedClock, MemFileSystem, MemTaskService};

    fn ctx_with(tasks: Vec<Task>) -> ServiceContext {
        ServiceContext {
            remote: Box::new(MemTaskService::with_tasks(tasks)),
            clock: Box::new(FixedClock::at("2025-03-09T12:00:00Z")),
            fs: Box::new(MemFileSystem::new()),
        }
    }

    #[tokio::test]
    async fn exports_to_dated_default_file() {
        let ctx = ctx_with(vec![Task::new(TaskId(1), "a", false)]);

        let message = run(&ctx, None).await.unwrap();

        assert_eq!(message, "Exported 1 tasks to todo-list-2025-03-09.json");
        let written = ctx.fs.read_to_string(Path::new("todo-list-2025-03-09.json")).unwrap();
        assert!(written.contains("\"text\": \"a\""));
    }

    #[tokio::test]
    async fn exports_to_given_path() {
        let ctx = ctx_with(Vec::new());
        run(&ctx, Some(Path::new("/tmp/out.json"))).await.unwrap();
        assert_eq!(ctx.fs.read_to_string(Path::new("/tmp/out.json")).unwrap(), "[]");
    }
}
