//! Movie models for the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default page when none is requested
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when none is requested
pub const DEFAULT_LIMIT: u32 = 8;

/// Movie record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub publishing_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new movie
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<String>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub publishing_year: Option<i32>,
}

impl MoviePatch {
    /// Apply present fields and a replacement poster to a movie
    pub fn apply(&self, movie: &mut Movie, poster: Option<&str>) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(year) = self.publishing_year {
            movie.publishing_year = year;
        }
        if let Some(poster) = poster {
            movie.poster = Some(poster.to_string());
        }
    }
}

/// Validated listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Trimmed, non-blank search term
    pub search: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl ListParams {
    /// Build params, treating a blank search term as no search
    pub fn new(page: u32, limit: u32, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        Self {
            page,
            limit,
            search,
        }
    }

    /// Rows to skip before the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Query parameters for movie listing, as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMoviesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

/// Pagination envelope around one page of movies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedMovies {
    pub movies: Vec<Movie>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl PaginatedMovies {
    /// Wrap a page of results with its metadata
    pub fn new(movies: Vec<Movie>, total: u64, params: &ListParams) -> Self {
        Self {
            movies,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: total_pages(total, params.limit),
        }
    }
}

/// `ceil(total / limit)`, zero for an empty page size
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}
