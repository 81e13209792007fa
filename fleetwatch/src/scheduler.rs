//! Background worker: one full check cycle, then a fixed sleep, forever.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::policy::Monitor;

// The sleep starts after the cycle finishes, so slow hosts stretch the period.
pub fn spawn_scheduler(monitor: Arc<Monitor>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            monitor.run_cycle().await;
            debug!(?period, "cycle complete");
            sleep(period).await;
        }
    })
}
