//! Scheduled class session ("jadwal").

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use shared::time::ScheduleTime;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{DomainError, DomainResult};
use crate::services::session_status::{classify_with_close, SessionStatus};

/// A scheduled class session owned by one lecturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub instructor_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub headcount: i32,
    pub token: String,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Derived status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        classify_with_close(now, self.start, self.end, self.closed_at)
    }

    pub fn is_owned_by(&self, lecturer_id: Uuid) -> bool {
        self.instructor_id == lecturer_id
    }

    /// Returns a copy with every provided field overwritten.
    ///
    /// Setting `end` explicitly re-opens a session that was closed early.
    pub fn with_changes(&self, changes: &SessionChanges) -> Session {
        let mut next = self.clone();
        if let Some(code) = &changes.course_code {
            next.course_code = code.clone();
        }
        if let Some(name) = &changes.course_name {
            next.course_name = name.clone();
        }
        if let Some(start) = changes.start {
            next.start = start;
        }
        if let Some(end) = changes.end {
            next.end = end;
            next.closed_at = None;
        }
        if let Some(description) = &changes.description {
            next.description = description.clone();
        }
        if let Some(headcount) = changes.headcount {
            next.headcount = headcount;
        }
        if let Some(token) = &changes.token {
            next.token = token.clone();
        }
        next
    }
}

/// Checks the schedule window of a session about to be stored.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if end < start {
        return Err(DomainError::Validation(
            "jam_selesai must not be earlier than jam_mulai".into(),
        ));
    }
    Ok(())
}

/// Input for inserting a session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub course_code: String,
    pub course_name: String,
    pub instructor_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub headcount: i32,
    pub token: String,
}

/// Trims a free-text field; blank becomes `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Request payload for creating a session.
///
/// `nama_mk` may be left out when `kode_mk` is in the course catalog;
/// `token_qr` is generated when absent or blank.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[serde(rename = "kode_mk")]
    #[validate(
        length(min = 1, max = 20, message = "kode_mk must be 1-20 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub course_code: String,

    #[serde(rename = "nama_mk", default)]
    #[validate(length(max = 150, message = "nama_mk must be at most 150 characters"))]
    pub course_name: Option<String>,

    #[serde(rename = "jam_mulai")]
    pub start: ScheduleTime,

    #[serde(rename = "jam_selesai")]
    pub end: ScheduleTime,

    #[serde(rename = "deskripsi", default)]
    #[validate(length(max = 500, message = "deskripsi must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(rename = "jumlah", default)]
    #[validate(range(min = 0, message = "jumlah must not be negative"))]
    pub headcount: i32,

    #[serde(rename = "token_qr", default)]
    #[validate(length(max = 128, message = "token_qr must be at most 128 characters"))]
    pub token: Option<String>,
}

/// Request payload for updating a session (partial update).
///
/// An empty `deskripsi` clears the description.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    #[serde(rename = "kode_mk", default)]
    #[validate(
        length(min = 1, max = 20, message = "kode_mk must be 1-20 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub course_code: Option<String>,

    #[serde(rename = "nama_mk", default)]
    #[validate(
        length(min = 1, max = 150, message = "nama_mk must be 1-150 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub course_name: Option<String>,

    #[serde(
        rename = "jam_mulai",
        default,
        deserialize_with = "shared::time::deserialize_optional"
    )]
    pub start: Option<ScheduleTime>,

    #[serde(
        rename = "jam_selesai",
        default,
        deserialize_with = "shared::time::deserialize_optional"
    )]
    pub end: Option<ScheduleTime>,

    #[serde(rename = "deskripsi", default)]
    #[validate(length(max = 500, message = "deskripsi must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(rename = "jumlah", default)]
    #[validate(range(min = 0, message = "jumlah must not be negative"))]
    pub headcount: Option<i32>,

    #[serde(rename = "token_qr", default)]
    #[validate(
        length(min = 1, max = 128, message = "token_qr must be 1-128 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub token: Option<String>,
}

impl UpdateSessionRequest {
    /// Trims text fields and resolves local times at `offset`.
    pub fn into_changes(self, offset: FixedOffset) -> SessionChanges {
        SessionChanges {
            course_code: normalize_text(self.course_code.as_deref()),
            course_name: normalize_text(self.course_name.as_deref()),
            start: self.start.map(|t| t.resolve(offset)),
            end: self.end.map(|t| t.resolve(offset)),
            description: self.description.as_deref().map(|d| normalize_text(Some(d))),
            headcount: self.headcount,
            token: normalize_text(self.token.as_deref()),
        }
    }
}

/// A normalized partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionChanges {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub headcount: Option<i32>,
    pub token: Option<String>,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsQuery {
    /// Restrict the list to the caller's own sessions.
    #[serde(default)]
    pub mine: bool,
}

/// Session as returned over the wire, with its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub kode_mk: String,
    pub nama_mk: String,
    pub instructor_id: Uuid,
    pub jam_mulai: DateTime<Utc>,
    pub jam_selesai: DateTime<Utc>,
    pub deskripsi: Option<String>,
    pub jumlah: i32,
    pub token_qr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionResponse {
    pub fn from_session(session: Session, now: DateTime<Utc>) -> Self {
        let status = session.status_at(now);
        Self {
            id: session.id,
            kode_mk: session.course_code,
            nama_mk: session.course_name,
            instructor_id: session.instructor_id,
            jam_mulai: session.start,
            jam_selesai: session.end,
            deskripsi: session.description,
            jumlah: session.headcount,
            token_qr: session.token,
            closed_at: session.closed_at,
            status,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
