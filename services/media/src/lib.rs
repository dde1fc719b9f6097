//! Poster image storage for the movie catalog
//!
//! Uploaded posters are checked for an image MIME type and a size ceiling,
//! then written to a local directory under a generated unique name. Callers
//! receive the public relative path (`/uploads/<name>`) to store on the
//! movie record.

pub mod models;
pub mod poster_store;

pub use models::{PosterUpload, UploadError};
pub use poster_store::{MAX_POSTER_BYTES, PUBLIC_PREFIX, PosterStore, is_accepted_type};
