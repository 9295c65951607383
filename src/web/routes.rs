//! HTTP handlers.
//!
//! Every mutating route follows post/redirect/get: it updates the session
//! and answers `303 See Other` back to `/`, which renders whichever page the
//! session state calls for.

use axum::Json;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::render::{ChatView, chat_page, login_page};
use super::{AppState, SessionHandle};
use crate::session::{LoginForm, Notice};

fn back_home() -> Redirect {
    Redirect::to("/")
}

/// GET /: login form or chat view.
pub async fn index(State(state): State<AppState>, handle: SessionHandle) -> Response {
    let mut session = handle.session.lock().await;
    let notice = session.take_notice();

    let html = match session.credentials() {
        None => {
            let text = match &notice {
                Some(Notice::LoginIncomplete(text)) => Some(text.as_str()),
                _ => None,
            };
            login_page(&state.login_defaults, text)
        }
        Some(credentials) => {
            let welcome = state.read_welcome().await;
            let error = match &notice {
                Some(Notice::ChatFailed(text)) => Some(text.as_str()),
                _ => None,
            };
            chat_page(&ChatView {
                server_url: credentials.url(),
                flow_id: credentials.flow_id(),
                welcome: welcome.as_deref(),
                messages: session.transcript().messages(),
                error,
            })
        }
    };
    drop(session);

    handle.respond(Html(html))
}

/// POST /login
pub async fn login(handle: SessionHandle, Form(form): Form<LoginForm>) -> Response {
    // Incomplete forms leave a notice for the next render.
    let _ = handle.session.lock().await.submit_login(form);
    handle.respond(back_home())
}

/// POST /logout, the sidebar's "Reset Flow".
pub async fn logout(handle: SessionHandle) -> Response {
    info!(session = %handle.id, "Logout");
    handle.session.lock().await.logout();
    handle.respond(back_home())
}

/// POST /conversation/delete
pub async fn delete_conversation(handle: SessionHandle) -> Response {
    handle.session.lock().await.delete_conversation();
    handle.respond(back_home())
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    handle: SessionHandle,
    Form(form): Form<ChatForm>,
) -> Response {
    if form.message.trim().is_empty() {
        return handle.respond(back_home());
    }

    // Held for the whole flow call so a session never runs two at once.
    let mut session = handle.session.lock().await;
    if session.is_authenticated() {
        // Failures are recorded on the session and shown on the next render.
        let _ = state.chat.send(&mut session, &form.message).await;
    }
    drop(session);

    handle.respond(back_home())
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    pub messages: Vec<crate::chat::Message>,
}

/// GET /api/session. The session as JSON. Never includes the API key.
pub async fn session_status(handle: SessionHandle) -> Response {
    let session = handle.session.lock().await;
    let status = SessionStatus {
        authenticated: session.is_authenticated(),
        server_url: session.credentials().map(|c| c.url().to_string()),
        flow_id: session.credentials().map(|c| c.flow_id().to_string()),
        messages: session.transcript().messages().to_vec(),
    };
    drop(session);
    handle.respond(Json(status))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "flow-chat",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
