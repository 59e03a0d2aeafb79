//! Error types for the refresh and logout endpoints.

use thiserror::Error;

/// Failure of a call against the authentication endpoints.
///
/// `Clone` so the same outcome can be handed to every caller awaiting a
/// shared request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// The refresh succeeded but neither accepted shape carried a token.
    #[error("refresh response did not contain an access token")]
    MissingToken,
}

impl AuthError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AuthError::Status {
                status: status.as_u16(),
            },
            None if e.is_decode() => AuthError::InvalidBody(e.to_string()),
            None => AuthError::Transport(e.to_string()),
        }
    }
}
