//! Terminal client for the movie catalog API
//!
//! [`ApiClient`] wraps the HTTP endpoints, [`ClientSession`] carries a login
//! across process invocations and [`debounce::Debouncer`] throttles
//! search-as-you-type listing requests.

pub mod api_client;
pub mod debounce;
pub mod error;
pub mod models;
pub mod session;

pub use api_client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use models::{Movie, MovieChanges, MoviePage, UserView};
pub use session::ClientSession;
