//! Movie CRUD, listing and poster uploads through the router

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use common::{Form, SECRET, TestApp, authed, authed_multipart};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

async fn create(app: &TestApp, token: &str, title: &str, year: &str) -> serde_json::Value {
    let form = Form::new()
        .text("title", title)
        .text("publishingYear", year)
        .build();
    let response = app
        .send(authed_multipart("POST", "/movies", token, form))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

async fn total(app: &TestApp, token: &str) -> u64 {
    let response = app.send(authed("GET", "/movies", token)).await;
    response.body["total"].as_u64().unwrap()
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = TestApp::new();

    for (method, uri) in [
        ("GET", "/movies"),
        ("GET", "/movies/1"),
        ("PATCH", "/movies/1"),
        ("DELETE", "/movies/1"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response.body["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn rejected_session_never_creates_a_movie() {
    let app = TestApp::new();
    let form = Form::new()
        .text("title", "Heat")
        .text("publishingYear", "1995")
        .file("poster", "heat.png", "image/png", PNG_BYTES)
        .build();

    let response = app
        .send(authed_multipart("POST", "/movies", "forged.token.value", form))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_posters(), 0);
    assert_eq!(total(&app, &app.token_for(1)).await, 0);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::new();
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "1",
        "email": "ada@example.com",
        "role": "user",
        "iat": now - 7200,
        "exp": now - 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = app.send(authed("GET", "/movies", &token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unauthorized");
}

#[tokio::test]
async fn bearer_header_is_accepted() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/movies")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", app.token_for(1)),
        )
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn create_with_poster_stores_file_and_path() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let form = Form::new()
        .text("title", "Heat")
        .text("publishingYear", "1995")
        .file("poster", "heat.png", "image/png", PNG_BYTES)
        .build();

    let response = app
        .send(authed_multipart("POST", "/movies", &token, form))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["title"], "Heat");
    assert_eq!(response.body["publishingYear"], 1995);
    let poster = response.body["poster"].as_str().unwrap();
    assert!(poster.starts_with("/uploads/"));
    assert!(poster.ends_with(".png"));
    assert_eq!(app.stored_posters(), 1);

    let id = response.body["id"].as_i64().unwrap();
    let fetched = app
        .send(authed("GET", &format!("/movies/{}", id), &token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, response.body);
}

#[tokio::test]
async fn create_without_poster_omits_it() {
    let app = TestApp::new();
    let token = app.token_for(1);

    let body = create(&app, &token, "Alien", "1979").await;

    assert!(body.get("poster").is_none());
    assert!(body.get("createdAt").is_some());
    assert_eq!(app.stored_posters(), 0);
}

#[tokio::test]
async fn empty_file_input_counts_as_no_poster() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let form = Form::new()
        .text("title", "Alien")
        .text("publishingYear", "1979")
        .file("poster", "", "application/octet-stream", b"")
        .build();

    let response = app
        .send(authed_multipart("POST", "/movies", &token, form))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body.get("poster").is_none());
}

#[tokio::test]
async fn publishing_year_bounds_are_enforced() {
    let app = TestApp::new();
    let token = app.token_for(1);

    create(&app, &token, "Oldest", "1800").await;

    for year in ["1799", "9999", "soon"] {
        let form = Form::new()
            .text("title", "Out of range")
            .text("publishingYear", year)
            .build();
        let response = app
            .send(authed_multipart("POST", "/movies", &token, form))
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{year}");
        assert_eq!(response.body["message"].as_array().map(Vec::len), Some(1));
    }

    assert_eq!(total(&app, &token).await, 1);
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let app = TestApp::new();
    let token = app.token_for(1);

    let response = app
        .send(authed_multipart("POST", "/movies", &token, Form::new().build()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        json!(["title should not be empty", "publishingYear should not be empty"])
    );
}

#[tokio::test]
async fn non_image_poster_is_rejected_before_persisting() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let form = Form::new()
        .text("title", "Heat")
        .text("publishingYear", "1995")
        .file("poster", "notes.txt", "text/plain", b"hello")
        .build();

    let response = app
        .send(authed_multipart("POST", "/movies", &token, form))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "Only image files are allowed! Got: text/plain"
    );
    assert_eq!(app.stored_posters(), 0);
    assert_eq!(total(&app, &token).await, 0);
}

#[tokio::test]
async fn oversized_poster_is_rejected_before_persisting() {
    let app = TestApp::with_poster_limit(16);
    let token = app.token_for(1);
    let form = Form::new()
        .text("title", "Heat")
        .text("publishingYear", "1995")
        .file("poster", "heat.png", "image/png", &[0u8; 64])
        .build();

    let response = app
        .send(authed_multipart("POST", "/movies", &token, form))
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.stored_posters(), 0);
    assert_eq!(total(&app, &token).await, 0);
}

#[tokio::test]
async fn listing_paginates_newest_first() {
    let app = TestApp::new();
    let token = app.token_for(1);
    for i in 1..=20 {
        create(&app, &token, &format!("Movie {}", i), "2001").await;
    }

    let first = app
        .send(authed("GET", "/movies?page=1&limit=8", &token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["movies"].as_array().map(Vec::len), Some(8));
    assert_eq!(first.body["movies"][0]["title"], "Movie 20");
    assert_eq!(first.body["total"], 20);
    assert_eq!(first.body["totalPages"], 3);

    let third = app
        .send(authed("GET", "/movies?page=3&limit=8", &token))
        .await;
    assert_eq!(third.body["movies"].as_array().map(Vec::len), Some(4));

    let beyond = app
        .send(authed("GET", "/movies?page=5&limit=8", &token))
        .await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert_eq!(beyond.body["movies"], json!([]));
    assert_eq!(beyond.body["page"], 5);
}

#[tokio::test]
async fn listing_defaults_to_eight_per_page() {
    let app = TestApp::new();
    let token = app.token_for(1);
    for i in 1..=9 {
        create(&app, &token, &format!("Movie {}", i), "2001").await;
    }

    let response = app.send(authed("GET", "/movies", &token)).await;

    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["limit"], 8);
    assert_eq!(response.body["movies"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn search_filters_by_title_substring() {
    let app = TestApp::new();
    let token = app.token_for(1);
    for title in ["Batman", "Combat", "Cat", "100%"] {
        create(&app, &token, title, "2000").await;
    }

    let response = app
        .send(authed("GET", "/movies?search=BAT", &token))
        .await;
    assert_eq!(response.body["total"], 2);

    let literal = app
        .send(authed("GET", "/movies?search=%25", &token))
        .await;
    assert_eq!(literal.body["total"], 1);
    assert_eq!(literal.body["movies"][0]["title"], "100%");
}

#[tokio::test]
async fn invalid_paging_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.token_for(1);

    for query in ["page=0", "limit=-1", "page=abc"] {
        let response = app
            .send(authed("GET", &format!("/movies?{}", query), &token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{query}");
    }
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = TestApp::new();
    let token = app.token_for(1);

    let missing = app.send(authed("GET", "/movies/42", &token)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Movie with ID 42 not found");

    let deleted = app.send(authed("DELETE", "/movies/42", &token)).await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);

    let malformed = app.send(authed("GET", "/movies/abc", &token)).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_changes_only_sent_fields() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let created = create(&app, &token, "Heat", "1995").await;
    let id = created["id"].as_i64().unwrap();

    let form = Form::new().text("title", "Heat (Director's Cut)").build();
    let response = app
        .send(authed_multipart(
            "PATCH",
            &format!("/movies/{}", id),
            &token,
            form,
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Heat (Director's Cut)");
    assert_eq!(response.body["publishingYear"], 1995);
    assert_eq!(response.body["createdAt"], created["createdAt"]);
    assert_ne!(response.body["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn patch_replaces_poster() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let created = create(&app, &token, "Heat", "1995").await;
    let id = created["id"].as_i64().unwrap();

    let form = Form::new()
        .file("poster", "heat.gif", "image/gif", b"GIF89a")
        .build();
    let response = app
        .send(authed_multipart(
            "PATCH",
            &format!("/movies/{}", id),
            &token,
            form,
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["poster"].as_str().unwrap().ends_with(".gif"));
    assert_eq!(response.body["title"], "Heat");
}

#[tokio::test]
async fn patch_unknown_movie_stores_nothing() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let form = Form::new()
        .file("poster", "heat.png", "image/png", PNG_BYTES)
        .build();

    let response = app
        .send(authed_multipart("PATCH", "/movies/9", &token, form))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.stored_posters(), 0);
}

#[tokio::test]
async fn delete_removes_the_movie() {
    let app = TestApp::new();
    let token = app.token_for(1);
    let created = create(&app, &token, "Heat", "1995").await;
    let uri = format!("/movies/{}", created["id"]);

    let response = app.send(authed("DELETE", &uri, &token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["message"],
        format!("Movie with ID {} deleted successfully", created["id"])
    );

    let after = app.send(authed("GET", &uri, &token)).await;
    assert_eq!(after.status, StatusCode::NOT_FOUND);
}
