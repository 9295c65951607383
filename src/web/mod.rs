//! Web front-end — server-rendered pages over axum.

pub mod extract;
pub mod markdown;
pub mod render;
pub mod routes;

pub use extract::{SESSION_COOKIE, SessionHandle};

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::chat::ChatLoop;
use crate::config::LoginDefaults;
use crate::session::SessionStore;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub chat: ChatLoop,
    pub login_defaults: Arc<LoginDefaults>,
    pub welcome_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionStore>,
        chat: ChatLoop,
        login_defaults: LoginDefaults,
        welcome_path: PathBuf,
    ) -> Self {
        Self {
            sessions,
            chat,
            login_defaults: Arc::new(login_defaults),
            welcome_path: Arc::new(welcome_path),
        }
    }

    /// Read the welcome document. Re-read on every render so edits show up
    /// without a restart; a missing file just hides the section.
    pub async fn read_welcome(&self) -> Option<String> {
        match tokio::fs::read_to_string(self.welcome_path.as_path()).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(path = %self.welcome_path.display(), error = %e, "No welcome document");
                None
            }
        }
    }
}

/// Build the router for the chat front-end.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/conversation/delete", post(routes::delete_conversation))
        .route("/chat", post(routes::chat))
        .route("/api/session", get(routes::session_status))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
