//! HTTP API for the movie catalog
//!
//! Exposes registration and login, and session-protected movie CRUD with
//! paginated search and poster uploads.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::{ApiConfig, StorageBackend};
pub use routes::create_router;
pub use state::AppState;
