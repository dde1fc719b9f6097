//! API models for request and response payloads

use serde::{Deserialize, Serialize};

use auth::UserResponse;

pub mod movie;

/// Credentials posted to `/auth/register` and `/auth/login`
///
/// Missing fields deserialize as empty strings so they surface as
/// validation messages instead of body rejections.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
