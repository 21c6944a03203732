//! Persistence layer for the Presensi backend.
//!
//! This crate contains:
//! - Database connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL repository implementations
//! - An in-memory repository implementation

pub mod db;
pub mod entities;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod repositories;

pub use memory::MemoryStore;
pub use repositories::postgres_repositories;
