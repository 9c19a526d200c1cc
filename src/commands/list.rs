//! `tickit list` command.

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::render::format_list;

/// Fetches the tasks matching `query` and renders them one per line.
///
/// # Errors
///
/// Returns an error string if the server cannot be reached.
pub async fn run(ctx: &ServiceContext, query: ListQuery) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    let tasks = controller.load(query).await.map_err(|e| e.to_string())?;
    Ok(format_list(&tasks))
}
