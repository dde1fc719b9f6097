//! Credential store and session issuer for the movie catalog
//!
//! Registers users with Argon2-hashed passwords, checks credentials on
//! login and issues stateless HS256 session tokens. Logout is a client-side
//! concern: tokens are not revoked and stay valid until they expire.

pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod session;
pub mod validation;

pub use error::AuthError;
pub use jwt::{Claims, JwtConfig, JwtService};
pub use models::{User, UserResponse};
pub use repositories::{MemoryUserRepository, PgUserRepository, UserRepository};
pub use service::{AuthOutcome, AuthService};
pub use session::SessionContext;
