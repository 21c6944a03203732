//! Session status classification.
//!
//! Status is never stored; it is re-derived from the schedule on every
//! read. Comparisons happen on absolute instants, so the display timezone
//! of a client has no influence on the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a session sits relative to the current moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not_started",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Finished => "finished",
        }
    }

    /// Human label used by the lecturer dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "Not Started",
            SessionStatus::InProgress => "In Progress",
            SessionStatus::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies `now` against a `[start, end]` window. Both ends inclusive.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> SessionStatus {
    if now < start {
        SessionStatus::NotStarted
    } else if now <= end {
        SessionStatus::InProgress
    } else {
        SessionStatus::Finished
    }
}

/// Classification for a session that may have been closed early.
///
/// Once `closed_at` has passed the session is finished, even at the instant
/// that equals its (rewritten) end time.
pub fn classify_with_close(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
) -> SessionStatus {
    match closed_at {
        Some(closed) if now >= closed => SessionStatus::Finished,
        _ => classify(now, start, end),
    }
}
