//! Error types for flow-chat.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session gate errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please fill in: {}", missing.join(", "))]
    IncompleteCredentials { missing: Vec<&'static str> },

    #[error("Not logged in to a flow")]
    NotAuthenticated,
}

/// Errors from a single call to the flow endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Could not build HTTP client: {reason}")]
    ClientBuild { reason: String },

    #[error("Could not reach the flow at {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Flow returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Unexpected flow response: {reason}")]
    MalformedResponse { reason: String },
}

/// Result type alias for flow-chat.
pub type Result<T> = std::result::Result<T, Error>;
