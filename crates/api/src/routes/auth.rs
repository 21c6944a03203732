//! Lecturer sign-in and token verification routes.

use axum::{extract::State, Json};
use validator::Validate;

use domain::models::lecturer::{
    EmailLoginRequest, LoginResponse, NidnLoginRequest, VerifyTokenResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, LecturerAuth};
use crate::services::auth::{AuthError, AuthService};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.repos.lecturers.clone(), state.jwt.clone())
}

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
        AuthError::LecturerNotFound => {
            ApiError::Unauthorized("Lecturer account no longer exists".into())
        }
        AuthError::Storage(e) => ApiError::from(e),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
    }
}

/// Sign in with NIDN and password.
///
/// POST /login-dosen
pub async fn login_by_nidn(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NidnLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let response = auth_service(&state)
        .login_by_nidn(&request.nidn, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(response))
}

/// Sign in with email and password.
///
/// POST /login
pub async fn login_by_email(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<EmailLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let response = auth_service(&state)
        .login_by_email(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(response))
}

/// Profile of the lecturer behind the bearer token.
///
/// GET /verify-token
pub async fn verify_token(
    State(state): State<AppState>,
    auth: LecturerAuth,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let payload = auth_service(&state)
        .profile(auth.lecturer_id)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(VerifyTokenResponse { payload }))
}
