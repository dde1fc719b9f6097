//! Wire shapes returned by the catalog API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public user object from register and login responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub publishing_year: i32,
    #[serde(default)]
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

/// Fields to change on an existing movie; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub publishing_year: Option<i32>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.publishing_year.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthReply {
    pub user: UserView,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageReply {
    pub message: String,
}

/// Error body: `message` is a string or a list of field messages
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    #[serde(default)]
    pub message: Value,
}

impl ErrorReply {
    pub fn text(&self) -> Option<String> {
        match &self.message {
            Value::String(message) => Some(message.clone()),
            Value::Array(messages) => Some(
                messages
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }
}
