//! Periodic refresh loop.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::collection::SnapshotDiff;
use crate::controller::TaskController;

/// Refreshes `controller` every `interval_period` until `ticks` refreshes have
/// run, or forever when `ticks` is `None`.
///
/// The first refresh happens one period after the call. A failed refresh is
/// logged and the loop carries on; local state is untouched by it. `on_diff`
/// sees every non-empty change set. Returns the number of refreshes run.
pub async fn poll(
    controller: &TaskController<'_>,
    interval_period: Duration,
    ticks: Option<u64>,
    mut on_diff: impl FnMut(&SnapshotDiff),
) -> u64 {
    let mut timer = interval(interval_period.max(Duration::from_millis(1)));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer.tick().await;

    let mut count = 0;
    while ticks.is_none_or(|limit| count < limit) {
        timer.tick().await;
        count += 1;
        match controller.refresh().await {
            Ok(diff) if diff.is_empty() => debug!(tick = count, "no changes"),
            Ok(diff) => on_diff(&diff),
            Err(e) => warn!(tick = count, error = %e, "refresh failed"),
        }
    }
    count
}
