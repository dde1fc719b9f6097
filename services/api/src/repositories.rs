//! Repositories for database operations

use common::error::DatabaseError;
use thiserror::Error;

pub mod movie;

pub use movie::{MemoryMovieRepository, MovieRepository, PgMovieRepository};

/// Errors raised by catalog storage
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.into())
    }
}

/// Type alias for repository results
pub type RepoResult<T> = Result<T, RepositoryError>;
