//! Authentication middleware for session token validation

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Name of the HTTP-only cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";
/// Name of the script-readable cookie carrying the user display object
pub const USER_COOKIE: &str = "user";

/// Authentication middleware
///
/// Reads the session token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header, verifies it and stores the resulting
/// [`auth::SessionContext`] in the request extensions. Requests without a
/// valid token never reach the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(&req))
        .ok_or_else(|| {
            debug!("Request without session token");
            ApiError::unauthorized()
        })?;

    let session = state.auth.verify_token(&token)?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
