//! User repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::DatabaseError;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{DEFAULT_ROLE, NewUser, User};

/// Errors raised by user storage
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// Another account already owns this email
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Storage for user accounts
///
/// Emails are expected to be normalized (trimmed, lower-cased) by the caller.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, failing on a duplicate email
    async fn create(&self, new_user: &NewUser) -> Result<User, UserStoreError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User, UserStoreError> {
        info!("Creating new user: {}", new_user.email);

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(DEFAULT_ROLE)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    Err(UserStoreError::DuplicateEmail(new_user.email.clone()))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(user)
    }
}

/// In-process user repository
///
/// Used when the service runs without PostgreSQL and by the test suites.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == new_user.email) {
            return Err(UserStoreError::DuplicateEmail(new_user.email.clone()));
        }

        let now = Utc::now();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: DEFAULT_ROLE.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
