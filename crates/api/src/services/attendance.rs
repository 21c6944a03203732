//! Attendance recording and roster review.

use chrono::{DateTime, Utc};
use domain::models::attendance::CheckInRequest;
use domain::models::{AttendanceRecord, AttendanceStatus, NewAttendanceRecord, Session};
use domain::services::{summarize, RosterSummary, SessionStatus};
use domain::{DomainError, DomainResult, Repositories};
use shared::crypto::token_fingerprint;
use shared::validation::validate_coordinate_pair;
use uuid::Uuid;

use crate::middleware::metrics::{record_check_in, record_check_in_rejected, record_status_override};

/// Attendance service.
pub struct AttendanceService {
    repos: Repositories,
    enforce_session_window: bool,
}

impl AttendanceService {
    pub fn new(repos: Repositories, enforce_session_window: bool) -> Self {
        Self {
            repos,
            enforce_session_window,
        }
    }

    /// Records a student check-in against the session owning `token_qr`.
    ///
    /// Without window enforcement a check-in is accepted whatever the
    /// session status; with it, only sessions in progress accept check-ins.
    pub async fn check_in(
        &self,
        request: CheckInRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<AttendanceRecord> {
        validate_coordinate_pair(request.lat, request.lng).map_err(|e| {
            DomainError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid coordinates".into()),
            )
        })?;

        let token = request.token_qr.trim();
        let session = self
            .repos
            .sessions
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::not_found("Session"))?;

        if self.enforce_session_window {
            let status = session.status_at(now);
            if status != SessionStatus::InProgress {
                record_check_in_rejected();
                tracing::info!(
                    session_id = session.id,
                    status = %status,
                    "Check-in rejected outside session window"
                );
                return Err(DomainError::Conflict(format!(
                    "Session is not accepting check-ins ({})",
                    status.label()
                )));
            }
        }

        let record = self
            .repos
            .attendance
            .create(
                NewAttendanceRecord {
                    session_id: session.id,
                    student_id: request.nim.trim().to_string(),
                    student_name: request.nama_mahasiswa.trim().to_string(),
                    checked_in_at: Some(now),
                    latitude: request.lat,
                    longitude: request.lng,
                    status: AttendanceStatus::default(),
                },
                now,
            )
            .await?;

        record_check_in();
        tracing::info!(
            session_id = session.id,
            attendance_id = record.id,
            token = %token_fingerprint(token),
            has_location = record.latitude.is_some(),
            "Check-in recorded"
        );
        Ok(record)
    }

    async fn session(&self, session_id: i64) -> DomainResult<Session> {
        self.repos
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session"))
    }

    /// The roster of a session, in check-in order.
    pub async fn list_by_session(&self, session_id: i64) -> DomainResult<Vec<AttendanceRecord>> {
        self.session(session_id).await?;
        self.repos.attendance.list_by_session(session_id).await
    }

    /// Per-status counts of a session roster.
    pub async fn summary(&self, session_id: i64) -> DomainResult<RosterSummary> {
        let session = self.session(session_id).await?;
        let records = self.repos.attendance.list_by_session(session_id).await?;
        Ok(summarize(&session, &records))
    }

    /// Overrides the status of one roster entry. Owner only.
    pub async fn update_status(
        &self,
        session_id: i64,
        record_id: i64,
        caller: Uuid,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<AttendanceRecord> {
        let session = self.session(session_id).await?;
        if !session.is_owned_by(caller) {
            return Err(DomainError::Forbidden(
                "Only the lecturer who created this session can change its roster".into(),
            ));
        }

        let existing = self
            .repos
            .attendance
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Attendance record"))?;
        if existing.session_id != session_id {
            return Err(DomainError::not_found(format!(
                "Attendance record {record_id} in session {session_id}"
            )));
        }

        let record = self
            .repos
            .attendance
            .update_status(session_id, record_id, status, now)
            .await?
            .ok_or_else(|| DomainError::not_found("Attendance record"))?;

        record_status_override(status);
        tracing::info!(
            session_id,
            attendance_id = record_id,
            status = status.as_str(),
            "Attendance status changed"
        );
        Ok(record)
    }
}
