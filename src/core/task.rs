use serde::{Deserialize, Serialize};

/// Lifecycle states reported by the task status endpoint.
///
/// COMPLETED and ERROR are the only terminal states. WARNING means the task
/// is still running but has something to show the user. Unrecognized or
/// absent states deserialize to `Unknown` rather than failing the whole
/// status fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    NotStarted,
    InProgress,
    Completed,
    Error,
    Warning,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskState::NotStarted => "NOT_STARTED",
            TaskState::InProgress => "IN_PROGRESS",
            TaskState::Completed => "COMPLETED",
            TaskState::Error => "ERROR",
            TaskState::Warning => "WARNING",
            TaskState::Unknown => "UNKNOWN",
        }
    }
}

/// Snapshot of a server-side task, as returned by the submit and
/// check-task-status endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub state: TaskState,
    pub stage: Option<String>,
    pub substage: Option<String>,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub error_context: Option<String>,
}

impl TaskStatus {
    /// Status rendered when a poll fetch itself fails. The poll session ends
    /// on this status; the server may still be running the task.
    pub fn transport_failure() -> Self {
        Self {
            state: TaskState::Error,
            message: Some("Failed to check task status".to_string()),
            ..Self::default()
        }
    }
}
