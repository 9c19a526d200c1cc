//! `tickit edit` command.

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::render::format_task;
use crate::task::TaskId;

/// Replaces the text of task `id`.
///
/// # Errors
///
/// Returns an error string if the task does not exist, the text is blank, or
/// the server call fails.
pub async fn run(ctx: &ServiceContext, id: TaskId, text: &str) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;
    let task = controller.edit(id, text).await.map_err(|e| e.to_string())?;
    Ok(format!("Updated {}", format_task(&task)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::task::Task;
    use crate::testing::MemTaskService;

    #[tokio::test]
    async fn edits_existing_task() {
        let ctx = context(MemTaskService::with_tasks(vec![Task::new(TaskId(4), "old", false)]));
        assert_eq!(run(&ctx, TaskId(4), "new").await.unwrap(), "Updated [ ] 4  new");
    }

    #[tokio::test]
    async fn unknown_id_is_an_error() {
        let ctx = context(MemTaskService::new());
        assert_eq!(run(&ctx, TaskId(9), "x").await.unwrap_err(), "task 9 not found");
    }
}
