pub mod auth;
pub mod error;
pub mod words;

pub use auth::{AuthSession, Callback};
pub use error::ApiError;
pub use words::{HttpWordStore, PageQuery, WordStore, DEFAULT_PAGE_LIMIT};
