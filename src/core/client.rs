use crate::core::backend::{SubmitRequest, SubmitResponse, TaskBackend};
use crate::core::config::Config;
use crate::core::task::TaskStatus;
use log::{error, info};
use reqwest::Client;
use std::io;
use std::time::Duration;

/// HTTP client for the auction operations service.
///
/// Submissions are form-encoded POSTs carrying the CSRF-style token both as
/// the `csrfmiddlewaretoken` field and as the `X-CSRFToken` header; status
/// polls are plain GETs.
pub struct AuctionClient {
    client: Client,
    base_url: String,
    csrf_token: String,
}

impl AuctionClient {
    pub fn new(config: &Config) -> io::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| io::Error::other(format!("Failed to create HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        info!("Created auction client for {base_url}");

        Ok(Self {
            client,
            base_url,
            csrf_token: config.csrf_token.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TaskBackend for AuctionClient {
    async fn submit(&self, request: &SubmitRequest) -> io::Result<SubmitResponse> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut form: Vec<(&str, &str)> = request
            .fields
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        form.push(("csrfmiddlewaretoken", self.csrf_token.as_str()));

        info!("Submitting to {url}");

        let response = self
            .client
            .post(&url)
            .header("X-CSRFToken", &self.csrf_token)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Submit request to {url} failed: {e}");
                io::Error::other(format!("Submit request failed: {e}"))
            })?;

        let http_status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read submit response from {url}: {e}");
            io::Error::other(format!("Failed to read response: {e}"))
        })?;

        // The service reports rejected submissions as an `error` field in a
        // JSON body, with a 4xx/5xx status. A well-formed error body wins
        // over the HTTP status; anything else non-2xx is a transport-level
        // failure.
        match serde_json::from_str::<SubmitResponse>(&text) {
            Ok(parsed) if parsed.error.is_some() || http_status.is_success() => Ok(parsed),
            Ok(_) => {
                error!("Submit to {url} returned {http_status}: {text}");
                Err(io::Error::other(format!(
                    "Server returned {http_status}: {text}"
                )))
            }
            Err(_) if !http_status.is_success() => {
                error!("Submit to {url} returned {http_status}: {text}");
                Err(io::Error::other(format!(
                    "Server returned {http_status}: {text}"
                )))
            }
            Err(e) => {
                error!("Failed to parse submit response from {url}: {e}");
                Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid JSON: {e}"),
                ))
            }
        }
    }

    async fn fetch_status(&self, task_id: &str) -> io::Result<TaskStatus> {
        let url = format!(
            "{}/auction/check-task-status/{}/?include_history=true",
            self.base_url,
            urlencoding::encode(task_id)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Status check for task {task_id} failed: {e}");
            io::Error::other(format!("Status request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Status check for task {task_id} returned {status}: {error_text}");
            return Err(io::Error::other(format!(
                "Status endpoint returned {status}: {error_text}"
            )));
        }

        let status: TaskStatus = response.json().await.map_err(|e| {
            error!("Failed to parse status for task {task_id}: {e}");
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid JSON: {e}"))
        })?;

        Ok(status)
    }
}
