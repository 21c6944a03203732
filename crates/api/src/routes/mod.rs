//! HTTP route handlers.

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod health;
pub mod sessions;
