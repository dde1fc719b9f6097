//! Error type for the session issuer

use thiserror::Error;

use crate::repositories::UserStoreError;

/// Errors raised while registering, logging in or verifying sessions
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration input failed validation, one message per field
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The email is already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged session token
    #[error("Unauthorized")]
    InvalidToken,

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Token signing failed
    #[error("Token signing error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token configuration is unusable
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// User storage failed
    #[error(transparent)]
    Storage(#[from] UserStoreError),
}
