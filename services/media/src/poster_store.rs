//! Local-disk poster storage

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{PosterUpload, UploadError};

/// Size ceiling for a single poster: 5 MiB
pub const MAX_POSTER_BYTES: usize = 5 * 1024 * 1024;

/// Public path prefix under which stored posters are served
pub const PUBLIC_PREFIX: &str = "/uploads";

const ACCEPTED_SUBTYPES: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Writes accepted posters into an upload directory
#[derive(Debug, Clone)]
pub struct PosterStore {
    upload_dir: PathBuf,
    max_bytes: usize,
}

impl PosterStore {
    /// Create a store writing into `upload_dir` with the default size ceiling
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes: MAX_POSTER_BYTES,
        }
    }

    /// Override the size ceiling
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Size ceiling in bytes
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Directory posters are written to
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.upload_dir).await?;
        info!("Poster directory ready at {}", self.upload_dir.display());
        Ok(())
    }

    /// Fail as soon as a partially received file exceeds the ceiling
    pub fn check_size(&self, received: usize) -> Result<(), UploadError> {
        if received > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Accept or refuse an upload without touching the disk
    pub fn check(&self, upload: &PosterUpload) -> Result<(), UploadError> {
        let content_type = upload.content_type.as_deref().unwrap_or_default();
        if !is_accepted_type(content_type) {
            return Err(UploadError::UnsupportedType(content_type.to_string()));
        }
        self.check_size(upload.data.len())
    }

    /// Validate and write an upload, returning its public relative path
    pub async fn store(&self, upload: &PosterUpload) -> Result<String, UploadError> {
        self.check(upload)?;

        let extension = extension_for(
            upload.file_name.as_deref(),
            upload.content_type.as_deref().unwrap_or_default(),
        );
        let file_name = format!("{}{}", Uuid::new_v4(), extension);

        fs::create_dir_all(&self.upload_dir).await?;
        fs::write(self.upload_dir.join(&file_name), &upload.data).await?;

        info!(bytes = upload.data.len(), "Stored poster {}", file_name);
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Delete a previously stored poster by its public path
    ///
    /// Paths outside the upload prefix are ignored; a missing file is not an
    /// error.
    pub async fn remove(&self, public_path: &str) -> Result<(), UploadError> {
        let Some(file_name) = stored_file_name(public_path) else {
            warn!("Refusing to remove poster outside upload dir: {}", public_path);
            return Ok(());
        };

        match fs::remove_file(self.upload_dir.join(file_name)).await {
            Ok(()) => {
                info!("Removed poster {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Whether a declared MIME type names an accepted image format
pub fn is_accepted_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("image", subtype)) => ACCEPTED_SUBTYPES.contains(&subtype),
        _ => false,
    }
}

fn extension_for(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()));

    if let Some(ext) = from_name {
        return ext;
    }

    let subtype = content_type
        .split(';')
        .next()
        .and_then(|essence| essence.trim().split_once('/'))
        .map(|(_, subtype)| subtype.to_ascii_lowercase());

    match subtype.as_deref() {
        Some("jpeg") | Some("jpg") => ".jpg".to_string(),
        Some("png") => ".png".to_string(),
        Some("gif") => ".gif".to_string(),
        _ => String::new(),
    }
}

fn stored_file_name(public_path: &str) -> Option<&str> {
    let name = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
    let plain = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    plain.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, file_name: &str, size: usize) -> PosterUpload {
        PosterUpload {
            file_name: Some(file_name.to_string()),
            content_type: Some(content_type.to_string()),
            data: vec![0xAB; size],
        }
    }

    #[test]
    fn accepts_only_listed_image_types() {
        assert!(is_accepted_type("image/png"));
        assert!(is_accepted_type("image/jpeg"));
        assert!(is_accepted_type("image/jpg"));
        assert!(is_accepted_type("IMAGE/GIF; charset=binary"));
        assert!(!is_accepted_type("image/svg+xml"));
        assert!(!is_accepted_type("application/pdf"));
        assert!(!is_accepted_type("text/png"));
        assert!(!is_accepted_type(""));
    }

    #[test]
    fn extension_prefers_the_original_name() {
        assert_eq!(extension_for(Some("Poster.PNG"), "image/png"), ".png");
        assert_eq!(extension_for(Some("poster"), "image/jpeg"), ".jpg");
        assert_eq!(extension_for(None, "image/gif"), ".gif");
        assert_eq!(extension_for(Some("x.weird$ext"), "image/png"), ".png");
    }

    #[test]
    fn stored_names_must_sit_directly_under_the_prefix() {
        assert_eq!(stored_file_name("/uploads/abc.png"), Some("abc.png"));
        assert_eq!(stored_file_name("/uploads/../etc/passwd"), None);
        assert_eq!(stored_file_name("/uploads/.."), None);
        assert_eq!(stored_file_name("/elsewhere/abc.png"), None);
        assert_eq!(stored_file_name("/uploads/"), None);
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let store = PosterStore::new("unused").with_max_bytes(10);
        assert!(store.check(&upload("image/png", "a.png", 10)).is_ok());
        assert!(matches!(
            store.check(&upload("image/png", "a.png", 11)),
            Err(UploadError::TooLarge { limit: 10 })
        ));
    }

    #[test]
    fn wrong_type_is_refused_before_size() {
        let store = PosterStore::new("unused");
        assert!(matches!(
            store.check(&upload("text/plain", "a.txt", 1)),
            Err(UploadError::UnsupportedType(t)) if t == "text/plain"
        ));
    }
}
