//! Progress reporting for a poll session running in the background

use crate::core::poller::PollOutcome;
use crate::core::task::TaskStatus;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Tick(TaskStatus),
    Finished(PollOutcome),
}

pub type PollEventSender = mpsc::Sender<PollEvent>;
pub type PollEventReceiver = mpsc::Receiver<PollEvent>;

pub fn poll_event_channel() -> (PollEventSender, PollEventReceiver) {
    mpsc::channel(100) // Buffer of 100 is plenty for 2s ticks
}
