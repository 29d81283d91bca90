//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every request made through the API port resolves to one of these, so a
/// request that never got a response is still a value the caller handles.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session error: {0}")]
    Session(String),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Http {
        status: u16,
        /// The `error` field of the response body, when there was one
        message: Option<String>,
    },

    /// The request never completed (connect failure, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Message the server put in the body's `error` field, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
