//! Authentication service models

pub mod user;

// Re-export for convenience
pub use user::{DEFAULT_ROLE, NewUser, User, UserResponse};
