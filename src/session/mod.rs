//! Per-browser session state — credentials gate plus transcript.
//!
//! A [`Session`] owns at most one set of [`Credentials`] (never a partial
//! set) and exactly one [`Transcript`]. The two reset independently:
//! `logout` drops the credentials, `delete_conversation` re-seeds the
//! transcript. Sessions live in a [`SessionStore`], one per browser cookie.

pub mod gate;
pub mod store;

pub use gate::{Credentials, LoginForm};
pub use store::{SessionStore, spawn_prune_task};

use tracing::{debug, info};

use crate::chat::transcript::{Message, Transcript};
use crate::error::SessionError;

/// One-shot message shown on the next render, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Login form was submitted with empty fields.
    LoginIncomplete(String),
    /// The last chat call failed; shown in the assistant's turn.
    ChatFailed(String),
}

/// In-memory state of one browsing session.
#[derive(Debug)]
pub struct Session {
    credentials: Option<Credentials>,
    transcript: Transcript,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            credentials: None,
            transcript: Transcript::new(greeting),
            notice: None,
        }
    }

    /// True iff all three credentials are held.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Validate and store a login form submission.
    ///
    /// Any empty field logs the session out, even if it was logged in
    /// before.
    pub fn submit_login(&mut self, form: LoginForm) -> Result<(), SessionError> {
        match Credentials::try_from(form) {
            Ok(credentials) => {
                info!(
                    url = %credentials.url(),
                    flow_id = %credentials.flow_id(),
                    "Logged in to flow"
                );
                self.credentials = Some(credentials);
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Login form incomplete");
                self.credentials = None;
                self.notice = Some(Notice::LoginIncomplete(e.to_string()));
                Err(e)
            }
        }
    }

    /// Drop the credentials. Idempotent.
    pub fn logout(&mut self) {
        if self.credentials.take().is_some() {
            info!("Logged out of flow");
        }
        self.notice = None;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.transcript.push(message);
    }

    /// Replace the transcript with the single greeting message.
    pub fn delete_conversation(&mut self) {
        self.transcript.reset();
        self.notice = None;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub(crate) fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
