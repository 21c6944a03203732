//! Session ("jadwal") routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use domain::models::session::{
    CreateSessionRequest, ListSessionsQuery, SessionResponse, UpdateSessionRequest,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, LecturerAuth, PathParams, QueryParams};
use crate::middleware::metrics::{record_session_closed, record_session_created};
use crate::services::SessionService;

fn session_service(state: &AppState) -> SessionService {
    SessionService::new(state.repos.clone(), state.config.time.utc_offset)
}

/// List sessions, optionally only the caller's own.
///
/// GET /jadwal?mine=true
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: LecturerAuth,
    QueryParams(query): QueryParams<ListSessionsQuery>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let owner = query.mine.then_some(auth.lecturer_id);
    let sessions = session_service(&state).list(owner).await?;

    let now = Utc::now();
    Ok(Json(
        sessions
            .into_iter()
            .map(|s| SessionResponse::from_session(s, now))
            .collect(),
    ))
}

/// GET /jadwal/:id
pub async fn get_session(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = session_service(&state).get(id).await?;
    Ok(Json(SessionResponse::from_session(session, Utc::now())))
}

/// Schedule a session owned by the caller.
///
/// POST /jadwal
pub async fn create_session(
    State(state): State<AppState>,
    auth: LecturerAuth,
    JsonBody(request): JsonBody<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    request.validate()?;

    let now = Utc::now();
    let session = session_service(&state)
        .create(auth.lecturer_id, request, now)
        .await?;
    record_session_created();

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from_session(session, now)),
    ))
}

/// Partial update. Owner only.
///
/// PUT /jadwal/:id
pub async fn update_session(
    State(state): State<AppState>,
    auth: LecturerAuth,
    PathParams(id): PathParams<i64>,
    JsonBody(request): JsonBody<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let now = Utc::now();
    let session = session_service(&state)
        .update(id, auth.lecturer_id, request, now)
        .await?;

    Ok(Json(SessionResponse::from_session(session, now)))
}

/// Delete a session and its roster. Owner only.
///
/// DELETE /jadwal/:id
pub async fn delete_session(
    State(state): State<AppState>,
    auth: LecturerAuth,
    PathParams(id): PathParams<i64>,
) -> Result<StatusCode, ApiError> {
    session_service(&state)
        .delete(id, auth.lecturer_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// End a running session immediately. Owner only.
///
/// POST /jadwal/:id/close
pub async fn close_session(
    State(state): State<AppState>,
    auth: LecturerAuth,
    PathParams(id): PathParams<i64>,
) -> Result<Json<SessionResponse>, ApiError> {
    let now = Utc::now();
    let session = session_service(&state)
        .close_now(id, auth.lecturer_id, now)
        .await?;
    record_session_closed();

    Ok(Json(SessionResponse::from_session(session, now)))
}
