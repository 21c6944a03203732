//! Attendance ("presensi") routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use domain::models::attendance::{AttendanceResponse, CheckInRequest, UpdateStatusRequest};
use domain::services::RosterSummary;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, LecturerAuth, PathParams};
use crate::services::AttendanceService;

fn attendance_service(state: &AppState) -> AttendanceService {
    AttendanceService::new(
        state.repos.clone(),
        state.config.attendance.enforce_session_window,
    )
}

/// Student check-in. Public: possession of the session token is the credential.
///
/// POST /presensi
pub async fn check_in(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CheckInRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiError> {
    request.validate()?;

    let record = attendance_service(&state)
        .check_in(request, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Roster of a session in check-in order.
///
/// GET /presensi/jadwal/:id
pub async fn list_attendance(
    State(state): State<AppState>,
    _auth: LecturerAuth,
    PathParams(session_id): PathParams<i64>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = attendance_service(&state)
        .list_by_session(session_id)
        .await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET /presensi/jadwal/:id/summary
pub async fn attendance_summary(
    State(state): State<AppState>,
    _auth: LecturerAuth,
    PathParams(session_id): PathParams<i64>,
) -> Result<Json<RosterSummary>, ApiError> {
    let summary = attendance_service(&state).summary(session_id).await?;
    Ok(Json(summary))
}

/// Override one roster entry's status. Session owner only.
///
/// PATCH /presensi/jadwal/:id/:presensi_id
pub async fn update_status(
    State(state): State<AppState>,
    auth: LecturerAuth,
    PathParams((session_id, record_id)): PathParams<(i64, i64)>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let record = attendance_service(&state)
        .update_status(
            session_id,
            record_id,
            auth.lecturer_id,
            request.status,
            Utc::now(),
        )
        .await?;

    Ok(Json(record.into()))
}
