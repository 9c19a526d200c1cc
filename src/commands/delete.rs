//! `tickit delete` command.

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::task::TaskId;

/// Deletes task `id`.
///
/// # Errors
///
/// Returns an error string if the task does not exist or the server call fails.
pub async fn run(ctx: &ServiceContext, id: TaskId) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;
    controller.delete(id).await.map_err(|e| e.to_string())?;
    Ok(format!("Deleted task {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::task::Task;
    use crate::testing::MemTaskService;

    #[tokio::test]
    async fn deletes_task() {
        let ctx = context(MemTaskService::with_tasks(vec![Task::new(TaskId(2), "x", false)]));
        assert_eq!(run(&ctx, TaskId(2)).await.unwrap(), "Deleted task 2");
        let remaining = ctx.remote.list_tasks(ListQuery::default()).await.unwrap();
        assert!(remaining.is_empty());
    }
}
