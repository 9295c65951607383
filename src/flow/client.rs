//! HTTP client for the Langflow run endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use super::{FlowRunner, RunRequest};
use crate::error::FlowError;
use crate::session::Credentials;

/// Longest error body excerpt kept for display.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Calls `POST {url}/{flow_id}?stream=false` with a bearer token.
pub struct LangflowClient {
    client: reqwest::Client,
}

impl LangflowClient {
    /// Create a client. `timeout` of `None` waits for the server indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FlowError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| FlowError::ClientBuild {
            reason: e.to_string(),
        })?;
        Ok(Self { client })
    }
}

/// Join the server URL and flow id. The query string is added separately.
pub fn run_url(credentials: &Credentials) -> String {
    format!(
        "{}/{}",
        credentials.url().trim_end_matches('/'),
        credentials.flow_id()
    )
}

#[async_trait]
impl FlowRunner for LangflowClient {
    async fn run(
        &self,
        credentials: &Credentials,
        request: &RunRequest,
    ) -> Result<serde_json::Value, FlowError> {
        let url = run_url(credentials);
        debug!(url = %url, "Running flow");

        let response = self
            .client
            .post(&url)
            .query(&[("stream", "false")])
            .bearer_auth(credentials.api_key().expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| FlowError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FlowError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Flow returned an error status");
            return Err(FlowError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FlowError::MalformedResponse {
            reason: format!("response body is not JSON ({e}): {}", excerpt(&body)),
        })
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{cut}…")
    }
}
