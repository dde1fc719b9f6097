//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use auth::{AuthService, JwtService, MemoryUserRepository, PgUserRepository};
use media::PosterStore;

use crate::catalog::CatalogService;
use crate::repositories::{MemoryMovieRepository, PgMovieRepository};

/// Attributes applied to the session cookies
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Send cookies over HTTPS only
    pub secure: bool,
    /// Cookie lifetime in seconds
    pub max_age_seconds: u64,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when PostgreSQL backs the repositories
    pub db_pool: Option<PgPool>,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub posters: PosterStore,
    pub cookies: CookieSettings,
}

impl AppState {
    /// Wire the PostgreSQL repositories
    pub fn postgres(pool: PgPool, jwt: JwtService, posters: PosterStore, secure: bool) -> Self {
        let cookies = CookieSettings {
            secure,
            max_age_seconds: jwt.token_ttl_seconds(),
        };

        Self {
            auth: AuthService::new(Arc::new(PgUserRepository::new(pool.clone())), jwt),
            catalog: CatalogService::new(Arc::new(PgMovieRepository::new(pool.clone()))),
            db_pool: Some(pool),
            posters,
            cookies,
        }
    }

    /// Wire the in-process repositories
    pub fn in_memory(jwt: JwtService, posters: PosterStore, secure: bool) -> Self {
        let cookies = CookieSettings {
            secure,
            max_age_seconds: jwt.token_ttl_seconds(),
        };

        Self {
            auth: AuthService::new(Arc::new(MemoryUserRepository::new()), jwt),
            catalog: CatalogService::new(Arc::new(MemoryMovieRepository::new())),
            db_pool: None,
            posters,
            cookies,
        }
    }
}
