//! Login state persisted between CLI invocations
//!
//! The session file holds the cookies issued by the API and the user object
//! returned at login, as JSON:
//!
//! ```json
//! {
//!   "apiUrl": "http://localhost:3001",
//!   "cookies": "token=eyJ...; user=%7B...%7D",
//!   "user": { "id": 1, "email": "ada@example.com", ... },
//!   "savedAt": "2025-01-01T00:00:00Z"
//! }
//! ```
//!
//! On Unix the file is written with mode 0600.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    api_client::ApiClient,
    error::{ClientError, ClientResult},
    models::UserView,
};

const SESSION_FILE: &str = "session.json";

/// A stored login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSession {
    pub api_url: String,
    pub cookies: String,
    pub user: Option<UserView>,
    pub saved_at: DateTime<Utc>,
}

impl ClientSession {
    /// Capture the cookies currently held by a client
    pub fn capture(client: &ApiClient, user: UserView) -> ClientResult<Self> {
        let cookies = client.cookies().ok_or(ClientError::NotLoggedIn)?;
        Ok(Self {
            api_url: client.base_url().to_string(),
            cookies,
            user: Some(user),
            saved_at: Utc::now(),
        })
    }

    /// `$HOME/.config/movies/session.json`, or `.movies-session.json` in
    /// the working directory when no home directory is known
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME").filter(|home| !home.is_empty()) {
            Some(home) => PathBuf::from(home)
                .join(".config")
                .join("movies")
                .join(SESSION_FILE),
            None => PathBuf::from(".movies-session.json"),
        }
    }

    /// Read a stored session; a missing file means no session
    pub fn load(path: &Path) -> ClientResult<Option<Self>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write the session, creating parent directories as needed
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("Saved session to {}", path.display());
        Ok(())
    }

    /// Delete the session file; a missing file is fine
    pub fn clear(path: &Path) -> ClientResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// A client that resends this session's cookies
    pub fn client(&self) -> ClientResult<ApiClient> {
        ApiClient::with_cookies(&self.api_url, &self.cookies)
    }
}
