//! Flow execution — one non-streaming call to a remote Langflow flow.
//!
//! The [`FlowRunner`] trait is the seam between the chat loop and the
//! network: [`LangflowClient`] speaks HTTP, tests plug in stubs.

pub mod client;
pub mod response;

pub use client::LangflowClient;
pub use response::extract_message_text;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::FlowError;
use crate::session::Credentials;

/// JSON body of a flow run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunRequest {
    pub input_value: String,
    pub output_type: String,
    pub input_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweaks: Option<serde_json::Value>,
}

impl RunRequest {
    /// A chat-in, chat-out run of `message`.
    pub fn chat(message: impl Into<String>) -> Self {
        Self {
            input_value: message.into(),
            output_type: "chat".to_string(),
            input_type: "chat".to_string(),
            tweaks: None,
        }
    }

    pub fn with_tweaks(mut self, tweaks: Option<serde_json::Value>) -> Self {
        self.tweaks = tweaks;
        self
    }
}

/// Runs a flow and returns the raw JSON response.
#[async_trait]
pub trait FlowRunner: Send + Sync {
    async fn run(
        &self,
        credentials: &Credentials,
        request: &RunRequest,
    ) -> Result<serde_json::Value, FlowError>;
}
