use crate::core::backend::TaskBackend;
use crate::core::task::{TaskState, TaskStatus};
use log::{error, info};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollConfig {
    pub fn from_millis(millis: u64) -> Self {
        Self {
            interval: Duration::from_millis(millis),
        }
    }
}

/// How a poll session ended. Exactly one outcome is produced per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Task reached COMPLETED.
    Completed,
    /// Task reached ERROR.
    ServerError,
    /// A status fetch failed; polling stopped without a server verdict.
    TransportFailed,
}

/// Polls `task_id` until it reaches a terminal state.
///
/// The first fetch happens one interval after the call, not immediately.
/// Every fetched status is passed to `on_tick` before the terminal check, so
/// the final state is always rendered. A fetch failure renders a generic
/// failure status and ends the session; it does not retry.
///
/// The ticker lives on this function's stack and is dropped before the
/// function returns, so no tick can fire after the outcome is produced.
pub async fn poll_until_terminal(
    backend: &dyn TaskBackend,
    task_id: &str,
    config: &PollConfig,
    mut on_tick: impl FnMut(&TaskStatus),
) -> PollOutcome {
    let mut ticker = time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "polling task {task_id} every {}ms",
        config.interval.as_millis()
    );

    loop {
        ticker.tick().await;

        match backend.fetch_status(task_id).await {
            Ok(status) => {
                on_tick(&status);
                // WARNING and the unknown fallback keep the loop alive.
                if status.state.is_terminal() {
                    info!("task {task_id} finished: {}", status.state.label());
                    return if status.state == TaskState::Completed {
                        PollOutcome::Completed
                    } else {
                        PollOutcome::ServerError
                    };
                }
            }
            Err(e) => {
                error!("status check for task {task_id} failed: {e}");
                on_tick(&TaskStatus::transport_failure());
                return PollOutcome::TransportFailed;
            }
        }
    }
}
