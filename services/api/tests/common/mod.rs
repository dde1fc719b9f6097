//! Shared helpers for router-level tests

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use api::{AppState, create_router};
use auth::{JwtConfig, JwtService, User};
use media::PosterStore;

pub const SECRET: &str = "router-test-secret";
pub const BOUNDARY: &str = "catalog-test-boundary";

/// A router over in-memory storage and a throwaway upload directory
pub struct TestApp {
    pub router: Router,
    pub jwt: JwtService,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_poster_limit(media::MAX_POSTER_BYTES)
    }

    pub fn with_poster_limit(max_bytes: usize) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let jwt = JwtService::new(JwtConfig::new(SECRET)).unwrap();
        let posters = PosterStore::new(uploads.path()).with_max_bytes(max_bytes);
        let state = AppState::in_memory(jwt.clone(), posters, false);

        Self {
            router: create_router(state),
            jwt,
            uploads,
        }
    }

    /// Mint a session token for a user id without going through login
    pub fn token_for(&self, id: i32) -> String {
        let now = chrono::Utc::now();
        let user = User {
            id,
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            role: "user".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.jwt.generate_token(&user).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            cookies,
            body,
        }
    }

    /// Number of files currently in the upload directory
    pub fn stored_posters(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub cookies: Vec<String>,
    pub body: Value,
}

impl TestResponse {
    /// Full `Set-Cookie` line for a cookie name
    pub fn cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}=", name);
        self.cookies
            .iter()
            .find(|line| line.starts_with(&prefix))
            .map(String::as_str)
    }

    /// Value part of a `Set-Cookie` line
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let line = self.cookie(name)?;
        let pair = line.split(';').next()?;
        pair.split_once('=').map(|(_, value)| value.to_string())
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_multipart(method: &str, uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("token={}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Builds a multipart/form-data body
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
