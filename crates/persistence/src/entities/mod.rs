//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod attendance;
pub mod course;
pub mod lecturer;
pub mod session;

pub use attendance::AttendanceEntity;
pub use course::CourseEntity;
pub use lecturer::LecturerEntity;
pub use session::SessionEntity;
