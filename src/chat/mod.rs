//! Chat loop — one question, one flow run, one answer.

pub mod transcript;

pub use transcript::{Message, Role, Transcript};

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Result, SessionError};
use crate::flow::{FlowRunner, RunRequest, extract_message_text};
use crate::session::{Notice, Session};

/// Sends user messages to the session's flow and records the replies.
#[derive(Clone)]
pub struct ChatLoop {
    runner: Arc<dyn FlowRunner>,
    tweaks: Option<serde_json::Value>,
}

impl ChatLoop {
    pub fn new(runner: Arc<dyn FlowRunner>) -> Self {
        Self {
            runner,
            tweaks: None,
        }
    }

    pub fn with_tweaks(mut self, tweaks: Option<serde_json::Value>) -> Self {
        self.tweaks = tweaks;
        self
    }

    /// Run one round-trip for `text`.
    ///
    /// The question is always recorded. The reply is recorded only when the
    /// flow answered with a well-formed response; otherwise the failure is
    /// left on the session as a [`Notice::ChatFailed`] and returned.
    pub async fn send(&self, session: &mut Session, text: &str) -> Result<()> {
        let credentials = session
            .credentials()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;

        session.clear_notice();
        session.push_message(Message::human(text));
        info!(flow_id = %credentials.flow_id(), chars = text.chars().count(), "Got question");

        let request = RunRequest::chat(text).with_tweaks(self.tweaks.clone());
        let outcome = match self.runner.run(&credentials, &request).await {
            Ok(response) => extract_message_text(&response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(reply) => {
                info!(chars = reply.chars().count(), "Flow replied");
                session.push_message(Message::ai(reply));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Flow call failed");
                session.set_notice(Notice::ChatFailed(e.to_string()));
                Err(e.into())
            }
        }
    }
}
