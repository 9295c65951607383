//! Session cookie extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::AppState;
use crate::session::Session;

pub const SESSION_COOKIE: &str = "flow_chat_session";

/// The caller's session, resolved from the session cookie.
pub struct SessionHandle {
    pub id: Uuid,
    pub session: Arc<Mutex<Session>>,
    created: bool,
}

impl SessionHandle {
    /// Attach the session cookie when this request started a new session.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.created {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(self.id)) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

impl FromRequestParts<AppState> for SessionHandle {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (id, session, created) = state
            .sessions
            .get_or_create(session_id_from_headers(&parts.headers))
            .await;
        Ok(Self {
            id,
            session,
            created,
        })
    }
}

fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
