use crate::core::task::TaskStatus;
use serde::Deserialize;
use std::io;

/// One form-encoded submission to an operation endpoint.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub endpoint: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl SubmitRequest {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }
}

/// Submit endpoints answer with either an `error` string or a status
/// snapshot, plus a `task_id` when the work continues asynchronously.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub status: TaskStatus,
}

/// Seam between the submission machinery and the HTTP transport.
#[async_trait::async_trait]
pub trait TaskBackend: Send + Sync {
    /// POST an operation to the service.
    async fn submit(&self, request: &SubmitRequest) -> io::Result<SubmitResponse>;

    /// Fetch the current status snapshot for a running task.
    async fn fetch_status(&self, task_id: &str) -> io::Result<TaskStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskState;

    #[test]
    fn submit_request_builder_collects_fields() {
        let request = SubmitRequest::new("/auction/void-unpaid/")
            .field("auction_id", "7")
            .field("warehouse", "east");

        assert_eq!(request.endpoint, "/auction/void-unpaid/");
        assert_eq!(
            request.fields,
            vec![("auction_id", "7".to_string()), ("warehouse", "east".to_string())]
        );
    }

    #[test]
    fn parses_error_only_response() {
        let response: SubmitResponse = serde_json::from_str(r#"{"error": "invalid bid"}"#).unwrap();
        assert_eq!(response.error.as_deref(), Some("invalid bid"));
        assert!(response.task_id.is_none());
        assert_eq!(response.status.state, TaskState::Unknown);
    }

    #[test]
    fn parses_accepted_task_response() {
        let response: SubmitResponse = serde_json::from_str(
            r#"{"task_id": "t1", "state": "IN_PROGRESS", "progress": 10}"#,
        )
        .unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.task_id.as_deref(), Some("t1"));
        assert_eq!(response.status.state, TaskState::InProgress);
        assert_eq!(response.status.progress, Some(10));
    }

    #[test]
    fn parses_synchronous_completion_without_task_id() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"state": "COMPLETED", "message": "done"}"#).unwrap();
        assert!(response.task_id.is_none());
        assert_eq!(response.status.state, TaskState::Completed);
    }
}
