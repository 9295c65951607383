//! Session gate — presence check of the three flow credentials.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::SessionError;

/// Credentials for one flow. Only constructed when all three are present.
#[derive(Debug, Clone)]
pub struct Credentials {
    url: String,
    flow_id: String,
    api_key: SecretString,
}

impl Credentials {
    /// Server URL, e.g. `https://host/api/v1/run`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Flow ID or endpoint name.
    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

/// Raw login form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub flow_id: String,
    #[serde(default)]
    pub api_key: String,
}

impl LoginForm {
    pub fn new(
        url: impl Into<String>,
        flow_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            flow_id: flow_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl TryFrom<LoginForm> for Credentials {
    type Error = SessionError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        let missing: Vec<&'static str> = [
            ("Langflow URL", form.url.is_empty()),
            ("Flow ID", form.flow_id.is_empty()),
            ("API key", form.api_key.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(SessionError::IncompleteCredentials { missing });
        }

        Ok(Self {
            url: form.url,
            flow_id: form.flow_id,
            api_key: SecretString::from(form.api_key),
        })
    }
}
