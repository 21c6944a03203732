//! Domain models for Presensi.

pub mod attendance;
pub mod course;
pub mod lecturer;
pub mod session;

pub use attendance::{AttendanceRecord, AttendanceStatus, NewAttendanceRecord};
pub use course::{Course, NewCourse};
pub use lecturer::{Lecturer, NewLecturer};
pub use session::{NewSession, Session};
