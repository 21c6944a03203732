//! Repository implementations for database operations.

pub mod attendance;
pub mod course;
pub mod lecturer;
pub mod session;

use std::sync::Arc;

use domain::Repositories;
use sqlx::PgPool;

pub use attendance::PgAttendanceRepository;
pub use course::PgCourseRepository;
pub use lecturer::PgLecturerRepository;
pub use session::PgSessionRepository;

/// Builds the PostgreSQL-backed repository set over one pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        lecturers: Arc::new(PgLecturerRepository::new(pool.clone())),
        courses: Arc::new(PgCourseRepository::new(pool.clone())),
        sessions: Arc::new(PgSessionRepository::new(pool.clone())),
        attendance: Arc::new(PgAttendanceRepository::new(pool)),
    }
}
