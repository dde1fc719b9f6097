//! Movie repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

use super::RepoResult;
use crate::models::movie::{ListParams, Movie, MoviePatch, NewMovie};

/// Storage for movie records
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a movie, assigning its id and timestamps
    async fn create(&self, new_movie: &NewMovie) -> RepoResult<Movie>;

    /// Fetch a movie by id
    async fn get(&self, id: i32) -> RepoResult<Option<Movie>>;

    /// Apply a patch and optional replacement poster; `None` if the id is unknown
    async fn update(
        &self,
        id: i32,
        patch: &MoviePatch,
        poster: Option<&str>,
    ) -> RepoResult<Option<Movie>>;

    /// Delete a movie; `false` if the id is unknown
    async fn delete(&self, id: i32) -> RepoResult<bool>;

    /// One page of movies, newest first, with the filtered total
    async fn list(&self, params: &ListParams) -> RepoResult<(Vec<Movie>, u64)>;
}

/// PostgreSQL-backed movie repository
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn create(&self, new_movie: &NewMovie) -> RepoResult<Movie> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, publishing_year, poster)
            VALUES ($1, $2, $3)
            RETURNING id, title, publishing_year, poster, created_at, updated_at
            "#,
        )
        .bind(&new_movie.title)
        .bind(new_movie.publishing_year)
        .bind(&new_movie.poster)
        .fetch_one(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn get(&self, id: i32) -> RepoResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, publishing_year, poster, created_at, updated_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn update(
        &self,
        id: i32,
        patch: &MoviePatch,
        poster: Option<&str>,
    ) -> RepoResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET title = COALESCE($2, title),
                publishing_year = COALESCE($3, publishing_year),
                poster = COALESCE($4, poster),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, title, publishing_year, poster, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(patch.publishing_year)
        .bind(poster)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, params: &ListParams) -> RepoResult<(Vec<Movie>, u64)> {
        let pattern = params
            .search
            .as_deref()
            .map(|term| format!("%{}%", escape_like(term)));
        let limit = i64::from(params.limit);
        let offset = i64::try_from(params.offset()).unwrap_or(i64::MAX);

        debug!(
            page = params.page,
            limit = params.limit,
            search = ?params.search,
            "Listing movies"
        );

        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, publishing_year, poster, created_at, updated_at
            FROM movies
            WHERE $1::TEXT IS NULL OR title ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM movies
            WHERE $1::TEXT IS NULL OR title ILIKE $1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((movies, u64::try_from(total).unwrap_or_default()))
    }
}

/// Escape `LIKE` metacharacters so the term matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Default)]
struct MemoryState {
    movies: Vec<Movie>,
    last_id: i32,
}

/// In-process movie repository
///
/// Used when the service runs without PostgreSQL and by the test suites.
#[derive(Default)]
pub struct MemoryMovieRepository {
    state: RwLock<MemoryState>,
}

impl MemoryMovieRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

/// Now, or just after `previous` when the clock has not moved past it
fn later_than(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[async_trait]
impl MovieRepository for MemoryMovieRepository {
    async fn create(&self, new_movie: &NewMovie) -> RepoResult<Movie> {
        let mut state = self.state.write().await;

        let created_at = match state.movies.iter().map(|m| m.created_at).max() {
            Some(latest) => later_than(latest),
            None => Utc::now(),
        };
        state.last_id += 1;

        let movie = Movie {
            id: state.last_id,
            title: new_movie.title.clone(),
            publishing_year: new_movie.publishing_year,
            poster: new_movie.poster.clone(),
            created_at,
            updated_at: created_at,
        };
        state.movies.push(movie.clone());

        Ok(movie)
    }

    async fn get(&self, id: i32) -> RepoResult<Option<Movie>> {
        let state = self.state.read().await;
        Ok(state.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn update(
        &self,
        id: i32,
        patch: &MoviePatch,
        poster: Option<&str>,
    ) -> RepoResult<Option<Movie>> {
        let mut state = self.state.write().await;

        let Some(movie) = state.movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        patch.apply(movie, poster);
        movie.updated_at = later_than(movie.updated_at);

        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.movies.len();
        state.movies.retain(|m| m.id != id);
        Ok(state.movies.len() < before)
    }

    async fn list(&self, params: &ListParams) -> RepoResult<(Vec<Movie>, u64)> {
        let state = self.state.read().await;
        let needle = params.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Movie> = state
            .movies
            .iter()
            .filter(|m| match &needle {
                Some(needle) => m.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as u64;
        let skip = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(skip)
            .take(params.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }
}
