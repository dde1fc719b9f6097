//! Upload payloads and errors

use thiserror::Error;

/// A poster file received from a client, fully buffered
#[derive(Debug, Clone)]
pub struct PosterUpload {
    /// File name as sent by the client
    pub file_name: Option<String>,
    /// Declared MIME type
    pub content_type: Option<String>,
    /// File contents
    pub data: Vec<u8>,
}

/// Reasons a poster is refused or cannot be stored
#[derive(Debug, Error)]
pub enum UploadError {
    /// Not one of the accepted image types
    #[error("Only image files are allowed! Got: {0}")]
    UnsupportedType(String),

    /// Larger than the size ceiling
    #[error("File too large: limit is {limit} bytes")]
    TooLarge { limit: usize },

    /// The file could not be written or removed
    #[error("Poster storage error: {0}")]
    Io(#[from] std::io::Error),
}
