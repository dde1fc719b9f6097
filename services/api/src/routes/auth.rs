//! Registration, login and logout endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use tracing::{error, info};

use auth::{AuthOutcome, UserResponse};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{TOKEN_COOKIE, USER_COOKIE},
    models::{AuthResponse, CredentialsRequest, MessageResponse},
    state::{AppState, CookieSettings},
};

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let outcome = state
        .auth
        .register(&payload.email, &payload.password)
        .await?;

    let (jar, body) = open_session(jar, &state.cookies, outcome, "Registration successful")?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut missing = Vec::new();
    if payload.email.trim().is_empty() {
        missing.push("email should not be empty".to_string());
    }
    if payload.password.is_empty() {
        missing.push("password should not be empty".to_string());
    }
    if !missing.is_empty() {
        return Err(ApiError::Validation(missing));
    }

    let outcome = state
        .auth
        .login(&payload.email, &payload.password)
        .await?;

    let (jar, body) = open_session(jar, &state.cookies, outcome, "Login successful")?;
    Ok((StatusCode::OK, jar, Json(body)))
}

/// Logout endpoint
///
/// Clears both session cookies. The token itself is not revoked and stays
/// valid until it expires.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    let jar = jar
        .remove(Cookie::build(TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(USER_COOKIE).path("/"));

    (StatusCode::OK, jar, Json(MessageResponse::new("Logout successful")))
}

fn open_session(
    jar: CookieJar,
    settings: &CookieSettings,
    outcome: AuthOutcome,
    message: &str,
) -> ApiResult<(CookieJar, AuthResponse)> {
    let user = UserResponse::from(&outcome.user);
    let user_json = serde_json::to_string(&user).map_err(|e| {
        error!("Failed to serialize user cookie: {}", e);
        ApiError::InternalServerError
    })?;

    let jar = jar
        .add(session_cookie(TOKEN_COOKIE, outcome.token, true, settings))
        .add(session_cookie(USER_COOKIE, user_json, false, settings));

    Ok((
        jar,
        AuthResponse {
            message: message.to_string(),
            user,
        },
    ))
}

fn session_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    settings: &CookieSettings,
) -> Cookie<'static> {
    let max_age = i64::try_from(settings.max_age_seconds).unwrap_or(i64::MAX);

    Cookie::build((name, value))
        .http_only(http_only)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}
