//! `tickit watch` command.

use std::time::Duration;

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::poll::poll;
use crate::ports::remote::ListQuery;
use crate::render::{format_diff, format_list};

/// Prints the task list, then every change picked up by periodic refreshes.
///
/// Runs until `ticks` refreshes have happened, or until interrupted.
///
/// # Errors
///
/// Returns an error string if the initial load fails. Later refresh failures
/// are logged and retried on the next tick.
pub async fn run(
    ctx: &ServiceContext,
    interval: Duration,
    ticks: Option<u64>,
) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    let tasks = controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;
    println!("{}", format_list(&tasks));

    let count = poll(&controller, interval, ticks, |diff| println!("{}", format_diff(diff))).await;
    Ok(format!("Stopped after {count} refreshes"))
}
