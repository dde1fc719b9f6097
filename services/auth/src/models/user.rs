//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Role tag given to every registered account
pub const DEFAULT_ROLE: &str = "user";

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
///
/// The password is already hashed by the time it reaches a repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user, safe to hand to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_never_carries_the_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: DEFAULT_ROLE.to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["role"], "user");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
