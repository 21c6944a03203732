//! Custom Axum extractors.

pub mod rejection;
pub mod user_auth;

pub use rejection::{JsonBody, PathParams, QueryParams};
pub use user_auth::LecturerAuth;
