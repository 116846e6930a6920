//! Periodic progress line.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::CoordinatorState;

/// Log a status line every `interval` until the task is aborted.
pub fn spawn_status_reporter(state: Arc<CoordinatorState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first line
        // appears one interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let snapshot = state.snapshot().await;
            tracing::info!("{}", snapshot);
        }
    })
}
