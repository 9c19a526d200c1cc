//! `tickit import` command.

use std::path::Path;

use tracing::warn;

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::transfer;

/// Replaces every task on the server with the contents of the file at `path`.
///
/// Entries with blank text are left out since the server rejects them.
///
/// # Errors
///
/// Returns an error string if the file cannot be read, is not a task list,
/// or the server call fails.
pub async fn run(ctx: &ServiceContext, path: &Path) -> Result<String, String> {
    let tasks =
        transfer::import(ctx.fs.as_ref(), ctx.clock.as_ref(), path).map_err(|e| e.to_string())?;
    let (new_tasks, skipped) = transfer::to_new_tasks(&tasks);
    if skipped > 0 {
        warn!(skipped, "skipping imported tasks with blank text");
    }

    let controller = TaskController::new(ctx.remote.as_ref());
    let created = controller.replace_all(&new_tasks).await.map_err(|e| e.to_string())?;

    let mut message = format!("Imported {} tasks from {}", created.len(), path.display());
    if skipped > 0 {
        message.push_str(&format!(" ({skipped} without text skipped)"));
    }
    Ok(message)
}
