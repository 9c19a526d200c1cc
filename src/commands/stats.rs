//! `tickit stats` command.

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::render::format_stats;

/// Loads every task and summarizes completion.
///
/// # Errors
///
/// Returns an error string if the server cannot be reached.
pub async fn run(ctx: &ServiceContext) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;
    Ok(format_stats(&controller.stats()))
}
