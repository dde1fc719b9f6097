//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod movies;

/// Room for the text fields and multipart framing around a poster
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.posters.max_bytes() + FORM_OVERHEAD_BYTES;

    let movie_routes = Router::new()
        .route(
            "/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(
            "/movies/:id",
            get(movies::get_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(movie_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database) = match &state.db_pool {
        Some(pool) if common::database::health_check(pool).await => (StatusCode::OK, "up"),
        Some(_) => (StatusCode::SERVICE_UNAVAILABLE, "down"),
        None => (StatusCode::OK, "memory"),
    };

    let overall = if status == StatusCode::OK {
        "ok"
    } else {
        "degraded"
    };

    (
        status,
        Json(json!({
            "status": overall,
            "service": "movie-catalog",
            "database": database,
        })),
    )
}
