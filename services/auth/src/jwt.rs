//! JWT service for session token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret. They are stateless:
//! nothing is stored server-side and a token stays valid until it expires.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::AuthError;
use crate::models::User;

/// Default session lifetime: 7 days
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret used to sign and verify tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 7 days)
    pub token_ttl_seconds: u64,
}

impl JwtConfig {
    /// Configuration with the default token lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_ttl_seconds", &self.config.token_ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, AuthError> {
        if config.secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "JWT secret must not be empty".to_string(),
            ));
        }
        if config.token_ttl_seconds == 0 {
            return Err(AuthError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Generate a session token for a user
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = now_secs()?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now,
            exp: now + self.config.token_ttl_seconds,
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims with the service key
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected session token: {}", e);
                AuthError::InvalidToken
            })?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time in seconds
    pub fn token_ttl_seconds(&self) -> u64 {
        self.config.token_ttl_seconds
    }
}

/// Seconds since the Unix epoch
pub fn now_secs() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AuthError::Configuration(format!("Failed to get current time: {}", e)))
}
