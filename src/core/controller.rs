use crate::core::backend::{SubmitRequest, TaskBackend};
use crate::core::guard::SubmissionLockStore;
use crate::core::poller::{PollConfig, PollOutcome, poll_until_terminal};
use crate::core::task::TaskStatus;
use log::{error, info};

/// Narrow rendering seam between the submission machinery and whatever is
/// showing it to the user. The controller only ever talks to this trait.
pub trait StatusView: Send {
    /// Duplicate-submission notice. Nothing else happens for that attempt.
    fn alert(&mut self, message: &str);
    /// Entering the busy state: the trigger is taken, work is in flight.
    fn set_busy(&mut self, label: &str);
    /// Leaving the busy state. Runs on every exit path after acquisition.
    fn set_idle(&mut self);
    fn show_status(&mut self, status: &TaskStatus);
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Guard rejected the duplicate; no network call was made.
    Rejected,
    /// Transport failure or explicit `error` in the submit response.
    SubmitFailed,
    /// Task finished in COMPLETED, or the submit completed synchronously.
    Completed,
    /// Task finished in ERROR.
    TaskFailed,
    /// A status poll failed; the task's fate is unknown.
    PollFailed,
}

impl SubmissionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, SubmissionOutcome::Completed)
    }
}

/// Orchestrates one submission: guard acquisition, the submit request, and
/// the handover to the poll loop. The guard permit is held for the whole
/// lifecycle and released when `submit` returns, whichever path it takes.
pub struct SubmissionController<B> {
    locks: SubmissionLockStore,
    backend: B,
    poll: PollConfig,
}

impl<B: TaskBackend> SubmissionController<B> {
    pub fn new(locks: SubmissionLockStore, backend: B, poll: PollConfig) -> Self {
        Self {
            locks,
            backend,
            poll,
        }
    }

    #[allow(dead_code)]
    pub fn locks(&self) -> &SubmissionLockStore {
        &self.locks
    }

    pub async fn submit(
        &self,
        target_key: &str,
        request: SubmitRequest,
        view: &mut dyn StatusView,
    ) -> SubmissionOutcome {
        let Some(_permit) = self.locks.acquire(target_key) else {
            view.alert(
                "This auction/event is already being processed. Please wait for it to complete.",
            );
            return SubmissionOutcome::Rejected;
        };

        view.set_busy("Processing your request...");
        info!("submitting {} for target '{target_key}'", request.endpoint);

        let response = match self.backend.submit(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("submit for '{target_key}' failed: {e}");
                view.show_error(&e.to_string());
                view.set_idle();
                return SubmissionOutcome::SubmitFailed;
            }
        };

        if let Some(message) = response.error {
            error!("submit for '{target_key}' rejected: {message}");
            view.show_error(&message);
            view.set_idle();
            return SubmissionOutcome::SubmitFailed;
        }

        view.show_status(&response.status);

        let outcome = match response.task_id {
            Some(task_id) => {
                let poll = poll_until_terminal(&self.backend, &task_id, &self.poll, |status| {
                    view.show_status(status)
                })
                .await;
                match poll {
                    PollOutcome::Completed => SubmissionOutcome::Completed,
                    PollOutcome::ServerError => SubmissionOutcome::TaskFailed,
                    PollOutcome::TransportFailed => SubmissionOutcome::PollFailed,
                }
            }
            // No task id: the operation completed inside the submit request.
            None => SubmissionOutcome::Completed,
        };

        view.set_idle();
        outcome
    }
}
