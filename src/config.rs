//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Assistant message seeded into every fresh transcript.
pub const DEFAULT_GREETING: &str = "Hi. How Langflow can help you?";

/// Environment variable names.
pub mod env {
    pub const BIND: &str = "FLOW_CHAT_BIND";
    pub const PORT: &str = "FLOW_CHAT_PORT";
    pub const LANGFLOW_URL: &str = "LANGFLOW_URL";
    pub const LANGFLOW_FLOW_ID: &str = "LANGFLOW_FLOW_ID";
    pub const LANGFLOW_API_KEY: &str = "LANGFLOW_API_KEY";
    pub const LANGFLOW_TWEAKS: &str = "LANGFLOW_TWEAKS";
    pub const WELCOME_PATH: &str = "FLOW_CHAT_WELCOME_PATH";
    pub const GREETING: &str = "FLOW_CHAT_GREETING";
    pub const SESSION_IDLE_SECS: &str = "FLOW_CHAT_SESSION_IDLE_SECS";
    pub const MAX_SESSIONS: &str = "FLOW_CHAT_MAX_SESSIONS";
    pub const REQUEST_TIMEOUT_SECS: &str = "FLOW_CHAT_REQUEST_TIMEOUT_SECS";
}

/// Values pre-filled into the login form. Never treated as a login.
#[derive(Debug, Clone, Default)]
pub struct LoginDefaults {
    pub url: Option<String>,
    pub flow_id: Option<String>,
    pub api_key: Option<SecretString>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub listen_addr: SocketAddr,
    /// Login form defaults.
    pub login_defaults: LoginDefaults,
    /// Extra `tweaks` object sent with every flow run.
    pub tweaks: Option<serde_json::Value>,
    /// Markdown shown above the transcript, read on every render.
    pub welcome_path: PathBuf,
    /// First assistant message of a fresh transcript.
    pub greeting: String,
    /// Sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
    /// Upper bound on live sessions.
    pub max_sessions: usize,
    /// Timeout for the outbound flow call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8501)),
            login_defaults: LoginDefaults::default(),
            tweaks: None,
            welcome_path: PathBuf::from("./welcome.md"),
            greeting: DEFAULT_GREETING.to_string(),
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            max_sessions: 10_000,
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind = match get(env::BIND) {
            Some(raw) => raw.parse().map_err(|e| invalid(env::BIND, e))?,
            None => defaults.listen_addr.ip(),
        };
        let port: u16 = match get(env::PORT) {
            Some(raw) => raw.parse().map_err(|e| invalid(env::PORT, e))?,
            None => defaults.listen_addr.port(),
        };

        let tweaks = match get(env::LANGFLOW_TWEAKS) {
            Some(raw) => {
                let value: serde_json::Value =
                    serde_json::from_str(&raw).map_err(|e| invalid(env::LANGFLOW_TWEAKS, e))?;
                if !value.is_object() {
                    return Err(invalid(env::LANGFLOW_TWEAKS, "expected a JSON object"));
                }
                Some(value)
            }
            None => None,
        };

        let session_idle_timeout = match get(env::SESSION_IDLE_SECS) {
            Some(raw) => {
                Duration::from_secs(raw.parse().map_err(|e| invalid(env::SESSION_IDLE_SECS, e))?)
            }
            None => defaults.session_idle_timeout,
        };

        let max_sessions = match get(env::MAX_SESSIONS) {
            Some(raw) => {
                let max: usize = raw.parse().map_err(|e| invalid(env::MAX_SESSIONS, e))?;
                if max == 0 {
                    return Err(invalid(env::MAX_SESSIONS, "must be at least 1"));
                }
                max
            }
            None => defaults.max_sessions,
        };

        let request_timeout = match get(env::REQUEST_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| invalid(env::REQUEST_TIMEOUT_SECS, e))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            listen_addr: SocketAddr::new(bind, port),
            login_defaults: LoginDefaults {
                url: get(env::LANGFLOW_URL),
                flow_id: get(env::LANGFLOW_FLOW_ID),
                api_key: get(env::LANGFLOW_API_KEY).map(SecretString::from),
            },
            tweaks,
            welcome_path: get(env::WELCOME_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.welcome_path),
            greeting: get(env::GREETING).unwrap_or(defaults.greeting),
            session_idle_timeout,
            max_sessions,
            request_timeout,
        })
    }
}

fn invalid(key: &str, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr.port(), 8501);
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert_eq!(config.welcome_path, PathBuf::from("./welcome.md"));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
        assert_eq!(config.max_sessions, 10_000);
        assert!(config.request_timeout.is_none());
        assert!(config.tweaks.is_none());
        assert!(config.login_defaults.url.is_none());
        assert!(config.login_defaults.api_key.is_none());
    }

    #[test]
    fn langflow_variables_become_login_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (env::LANGFLOW_URL, "http://localhost:7860/api/v1/run"),
            (env::LANGFLOW_FLOW_ID, "my-flow"),
            (env::LANGFLOW_API_KEY, "sk-123"),
        ]))
        .unwrap();

        let defaults = config.login_defaults;
        assert_eq!(defaults.url.as_deref(), Some("http://localhost:7860/api/v1/run"));
        assert_eq!(defaults.flow_id.as_deref(), Some("my-flow"));
        assert_eq!(defaults.api_key.unwrap().expose_secret(), "sk-123");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config =
            AppConfig::from_lookup(lookup(&[(env::LANGFLOW_URL, "  "), (env::PORT, "")])).unwrap();
        assert!(config.login_defaults.url.is_none());
        assert_eq!(config.listen_addr.port(), 8501);
    }

    #[test]
    fn bind_and_port_are_parsed() {
        let config =
            AppConfig::from_lookup(lookup(&[(env::BIND, "127.0.0.1"), (env::PORT, "9000")]))
                .unwrap();
        assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(env::PORT, "eighty")])).unwrap_err();
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, env::PORT);
    }

    #[test]
    fn tweaks_must_be_a_json_object() {
        let config = AppConfig::from_lookup(lookup(&[(
            env::LANGFLOW_TWEAKS,
            r#"{"ChatInput-abc": {"sender_name": "me"}}"#,
        )]))
        .unwrap();
        assert_eq!(config.tweaks.unwrap()["ChatInput-abc"]["sender_name"], "me");

        assert!(AppConfig::from_lookup(lookup(&[(env::LANGFLOW_TWEAKS, "[1, 2]")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(env::LANGFLOW_TWEAKS, "{nope")])).is_err());
    }

    #[test]
    fn zero_request_timeout_means_none() {
        let config = AppConfig::from_lookup(lookup(&[(env::REQUEST_TIMEOUT_SECS, "0")])).unwrap();
        assert!(config.request_timeout.is_none());

        let config = AppConfig::from_lookup(lookup(&[(env::REQUEST_TIMEOUT_SECS, "30")])).unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn max_sessions_must_be_positive() {
        let config = AppConfig::from_lookup(lookup(&[(env::MAX_SESSIONS, "250")])).unwrap();
        assert_eq!(config.max_sessions, 250);

        let err = AppConfig::from_lookup(lookup(&[(env::MAX_SESSIONS, "0")])).unwrap_err();
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, env::MAX_SESSIONS);
    }
}
