//! `tickit toggle` command.

use std::sync::{Arc, Mutex, PoisonError};

use crate::context::ServiceContext;
use crate::controller::TaskController;
use crate::ports::remote::ListQuery;
use crate::render::describe;
use crate::task::TaskId;

/// Flips task `id` between completed and pending.
///
/// Reports each step the controller goes through: the optimistic flip, then
/// either the server's record or the rollback.
///
/// # Errors
///
/// Returns the progress lines and the failure if the task does not exist or
/// the server call fails.
pub async fn run(ctx: &ServiceContext, id: TaskId) -> Result<String, String> {
    let controller = TaskController::new(ctx.remote.as_ref());
    controller.load(ListQuery::default()).await.map_err(|e| e.to_string())?;

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    controller.subscribe(move |event| {
        if let Some(line) = describe(event) {
            sink.lock().unwrap_or_else(PoisonError::into_inner).push(line);
        }
    });

    let result = controller.toggle(id).await;
    let report = lines.lock().unwrap_or_else(PoisonError::into_inner).join("\n");
    match result {
        Ok(_) => Ok(report),
        Err(e) if report.is_empty() => Err(e.to_string()),
        Err(e) => Err(format!("{report}\n{e}")),
    }
}
