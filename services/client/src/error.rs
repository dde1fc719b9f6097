//! Error types for the catalog client

use thiserror::Error;

/// Errors raised by client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure or undecodable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No stored login for a call that needs one
    #[error("Not logged in")]
    NotLoggedIn,

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file could not be read or written
    #[error("Session file error: {0}")]
    Session(#[from] serde_json::Error),

    /// Bad client-side input such as an unusable base URL
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
