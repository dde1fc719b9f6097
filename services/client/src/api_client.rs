//! Typed HTTP client for the catalog API

use reqwest::{
    Client, Response, Url,
    cookie::{CookieStore, Jar},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{path::Path, sync::Arc};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientResult},
    models::{AuthReply, ErrorReply, MessageReply, Movie, MovieChanges, MoviePage, UserView},
};

/// Default API location
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// HTTP client holding the session cookies issued by the API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl ApiClient {
    /// Create a client without a session
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidInput(format!("bad API URL {}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self {
            http,
            jar,
            base_url,
        })
    }

    /// Create a client that resends previously stored session cookies
    pub fn with_cookies(base_url: &str, cookies: &str) -> ClientResult<Self> {
        let client = Self::new(base_url)?;
        for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            client.jar.add_cookie_str(pair, &client.base_url);
        }
        Ok(client)
    }

    /// API base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Current session cookies as a `Cookie` header value
    pub fn cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    /// Create an account; the API logs the new user in
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<UserView> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let reply: AuthReply = decode(response).await?;
        Ok(reply.user)
    }

    /// Exchange credentials for session cookies
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserView> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let reply: AuthReply = decode(response).await?;
        Ok(reply.user)
    }

    /// Ask the API to clear the session cookies
    ///
    /// Best-effort: failures are logged and swallowed so the caller can
    /// always drop its local session.
    pub async fn logout(&self) {
        let result = match self.http.post(self.url("/auth/logout")).send().await {
            Ok(response) => decode::<MessageReply>(response).await.map(|_| ()),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            warn!("Logout request failed, clearing local session anyway: {}", e);
        }
    }

    /// One page of the catalog, optionally filtered by title
    pub async fn list(&self, page: u32, limit: u32, search: Option<&str>) -> ClientResult<MoviePage> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query.push(("search", term.to_string()));
        }

        debug!(page, limit, search = ?search, "Listing movies");
        let response = self
            .http
            .get(self.url("/movies"))
            .query(&query)
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch a movie by id
    pub async fn get(&self, id: i32) -> ClientResult<Movie> {
        let response = self
            .http
            .get(self.url(&format!("/movies/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    /// Add a movie, optionally uploading a poster file
    pub async fn create(
        &self,
        title: &str,
        publishing_year: i32,
        poster: Option<&Path>,
    ) -> ClientResult<Movie> {
        let mut form = Form::new()
            .text("title", title.to_string())
            .text("publishingYear", publishing_year.to_string());
        if let Some(path) = poster {
            form = form.part("poster", poster_part(path).await?);
        }

        let response = self
            .http
            .post(self.url("/movies"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    /// Change some fields of a movie and optionally replace its poster
    pub async fn update(
        &self,
        id: i32,
        changes: &MovieChanges,
        poster: Option<&Path>,
    ) -> ClientResult<Movie> {
        let mut form = Form::new();
        if let Some(title) = &changes.title {
            form = form.text("title", title.clone());
        }
        if let Some(year) = changes.publishing_year {
            form = form.text("publishingYear", year.to_string());
        }
        if let Some(path) = poster {
            form = form.part("poster", poster_part(path).await?);
        }

        let response = self
            .http
            .patch(self.url(&format!("/movies/{}", id)))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete a movie, returning the API's confirmation message
    pub async fn delete(&self, id: i32) -> ClientResult<String> {
        let response = self
            .http
            .delete(self.url(&format!("/movies/{}", id)))
            .send()
            .await?;
        let reply: MessageReply = decode(response).await?;
        Ok(reply.message)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorReply>(&body)
        .ok()
        .and_then(|reply| reply.text())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn poster_part(path: &Path) -> ClientResult<Part> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("poster")
        .to_string();

    Ok(Part::bytes(data)
        .file_name(file_name)
        .mime_str(mime_for(path))?)
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
