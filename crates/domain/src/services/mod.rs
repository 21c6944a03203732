//! Pure domain logic shared by the storage adapters and the HTTP layer.

pub mod roster;
pub mod session_status;

pub use roster::{summarize, RosterSummary};
pub use session_status::{classify, classify_with_close, SessionStatus};
