//! Lecturer JWT authentication middleware.
//!
//! Validates the `Authorization: Bearer <token>` header and stores the
//! authenticated lecturer in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::LecturerAuth;

/// Returns the bearer token of a request, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid lecturer token.
///
/// Requests without one are rejected with 401; an expired token yields the
/// `token_expired` error code so clients know to sign in again.
pub async fn require_lecturer_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".into())
            .into_response();
    };

    match LecturerAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            tracing::debug!(lecturer_id = %auth.lecturer_id, "Lecturer authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "JWT validation failed");
            err.into_response()
        }
    }
}
