//! Error types for the todo API client.
//!
//! # Design
//! Every failure of an API call collapses into one of these variants, and
//! the `Display` output of each is the exact text shown to the user. There
//! are two shapes of message: server-reported failures print the status
//! and the server's message on two lines, everything that happened on the
//! client side prints `Error: <detail>`.

use thiserror::Error;

/// Errors produced while talking to the todo API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (DNS, connection refused, TLS, ...).
    #[error("Error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status, or with a 2xx body that
    /// could not be decoded.
    #[error("Código: {status}\nMensaje: {message}")]
    Server { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("Error: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
