//! Business services used by the route handlers.

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod lecturer_bootstrap;
pub mod sessions;

pub use attendance::AttendanceService;
pub use auth::{AuthError, AuthService};
pub use courses::CourseService;
pub use lecturer_bootstrap::{bootstrap_lecturer, BootstrapError};
pub use sessions::SessionService;
