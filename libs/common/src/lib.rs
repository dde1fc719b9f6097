//! Common library for the movie catalog
//!
//! This crate provides shared functionality used across the catalog
//! services, including database connectivity, schema migrations and
//! database error handling.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
