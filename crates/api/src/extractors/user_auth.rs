//! Lecturer JWT authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::{extract_lecturer_id, JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::bearer_token;

/// The lecturer a request is authenticated as.
///
/// Taken from request extensions when `require_lecturer_auth` already ran,
/// otherwise validated from the bearer token directly.
#[derive(Debug, Clone)]
pub struct LecturerAuth {
    pub lecturer_id: Uuid,
    pub nidn: String,
    /// JWT ID (jti) of the presented token.
    pub jti: String,
}

impl LecturerAuth {
    /// Validates an access token.
    pub fn validate(jwt: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => ApiError::TokenExpired,
            _ => ApiError::Unauthorized("Invalid token".into()),
        })?;

        let lecturer_id = extract_lecturer_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid lecturer ID in token".into()))?;

        Ok(Self {
            lecturer_id,
            nidn: claims.nidn,
            jti: claims.jti,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for LecturerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<LecturerAuth>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid Authorization header".into())
        })?;

        LecturerAuth::validate(&state.jwt, token)
    }
}
