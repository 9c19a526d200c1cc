//! `tickit add` command.

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::render::format_task;

/// Creates a task on the server.
///
/// # Errors
///
/// Returns an error string if the text is blank or the server rejects it.
pub async fn run(ctx: &ServiceContext, text: &str) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    let task = controller.create(text).await.map_err(|e| e.to_string())?;
    Ok(format!("Added {}", format_task(&task)))
}
