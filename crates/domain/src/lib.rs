//! Domain layer for the Presensi backend.
//!
//! This crate contains:
//! - Domain models (Lecturer, Course, Session, AttendanceRecord)
//! - Session status classification and roster aggregation
//! - Repository traits implemented by `persistence`
//! - Domain error types

pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;

pub use errors::{DomainError, DomainResult};
pub use repositories::Repositories;
