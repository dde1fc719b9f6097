//! Catalog service: movie use cases on top of the repository

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use auth::SessionContext;

use crate::models::movie::{ListParams, Movie, MoviePatch, NewMovie, PaginatedMovies};
use crate::repositories::{MovieRepository, RepositoryError};

/// Errors raised by catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No movie has this id
    #[error("Movie with ID {0} not found")]
    NotFound(i32),

    /// Storage failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Movie catalog operations
#[derive(Clone)]
pub struct CatalogService {
    movies: Arc<dyn MovieRepository>,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }

    /// One page of the whole catalog
    pub async fn find_all(
        &self,
        ctx: &SessionContext,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedMovies, CatalogError> {
        self.list(ctx, &ListParams::new(page, limit, None)).await
    }

    /// One page of movies whose title contains `term`
    pub async fn search(
        &self,
        ctx: &SessionContext,
        term: &str,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedMovies, CatalogError> {
        self.list(ctx, &ListParams::new(page, limit, Some(term)))
            .await
    }

    /// Filtered listing wrapped in the pagination envelope
    pub async fn list(
        &self,
        ctx: &SessionContext,
        params: &ListParams,
    ) -> Result<PaginatedMovies, CatalogError> {
        let (movies, total) = self.movies.list(params).await?;
        tracing::debug!(
            user_id = ctx.user_id,
            page = params.page,
            total,
            "Listed movies"
        );
        Ok(PaginatedMovies::new(movies, total, params))
    }

    /// Fetch one movie or fail with NotFound
    pub async fn find_one(&self, ctx: &SessionContext, id: i32) -> Result<Movie, CatalogError> {
        tracing::debug!(user_id = ctx.user_id, movie_id = id, "Fetching movie");
        self.movies
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Add a movie to the catalog
    pub async fn create(
        &self,
        ctx: &SessionContext,
        new_movie: &NewMovie,
    ) -> Result<Movie, CatalogError> {
        let movie = self.movies.create(new_movie).await?;
        info!(user_id = ctx.user_id, movie_id = movie.id, "Movie created");
        Ok(movie)
    }

    /// Apply a partial update; the movie must exist
    pub async fn update(
        &self,
        ctx: &SessionContext,
        id: i32,
        patch: &MoviePatch,
        poster: Option<&str>,
    ) -> Result<Movie, CatalogError> {
        self.find_one(ctx, id).await?;

        let movie = self
            .movies
            .update(id, patch, poster)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        info!(user_id = ctx.user_id, movie_id = id, "Movie updated");
        Ok(movie)
    }

    /// Delete a movie; the movie must exist
    pub async fn remove(&self, ctx: &SessionContext, id: i32) -> Result<(), CatalogError> {
        self.find_one(ctx, id).await?;

        if !self.movies.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        info!(user_id = ctx.user_id, movie_id = id, "Movie deleted");
        Ok(())
    }
}
