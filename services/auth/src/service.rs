//! Registration, login and session verification

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::AuthError,
    jwt::JwtService,
    models::{NewUser, User},
    password,
    repositories::{UserRepository, UserStoreError},
    session::SessionContext,
    validation,
};

/// A user together with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
}

/// Credential store and session issuer
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Register a new account and open a session for it
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = validation::normalize_email(email);
        validation::validate_registration(&email, password).map_err(AuthError::Validation)?;

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already registered: {}", email);
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_off_thread(password.to_string()).await?;
        let user = self
            .users
            .create(&NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                UserStoreError::DuplicateEmail(_) => AuthError::EmailTaken,
                other => AuthError::Storage(other),
            })?;

        info!(user_id = user.id, "User registered");
        let token = self.jwt.generate_token(&user)?;
        Ok(AuthOutcome { user, token })
    }

    /// Check credentials and open a session
    ///
    /// Unknown email and wrong password fail with the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = validation::normalize_email(email);
        let user = self.users.find_by_email(&email).await?;

        let password = password.to_string();
        let verified = match &user {
            Some(user) => {
                let hash = user.password_hash.clone();
                run_blocking(move || password::verify_password(&password, &hash)).await?
            }
            None => {
                run_blocking(move || password::verify_against_dummy(&password)).await?;
                false
            }
        };

        match user {
            Some(user) if verified => {
                info!(user_id = user.id, "User logged in");
                let token = self.jwt.generate_token(&user)?;
                Ok(AuthOutcome { user, token })
            }
            _ => {
                warn!("Failed login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Verify a session token and build the request context
    pub fn verify_token(&self, token: &str) -> Result<SessionContext, AuthError> {
        let claims = self.jwt.validate_token(token)?;
        SessionContext::try_from(claims)
    }

    /// Lifetime of issued tokens in seconds
    pub fn token_ttl_seconds(&self) -> u64 {
        self.jwt.token_ttl_seconds()
    }
}

async fn hash_off_thread(password: String) -> Result<String, AuthError> {
    run_blocking(move || password::hash_password(&password)).await?
}

async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))
}
