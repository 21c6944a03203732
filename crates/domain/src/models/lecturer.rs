//! Lecturer ("dosen") accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A lecturer who can sign in and own sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct Lecturer {
    pub id: Uuid,
    pub nidn: String,
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a lecturer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLecturer {
    pub nidn: String,
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
}

/// Login with the lecturer's NIDN.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NidnLoginRequest {
    #[validate(length(min = 1, max = 32, message = "nidn is required"))]
    pub nidn: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login with the lecturer's email address.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Public view of a lecturer, returned by token verification.
#[derive(Debug, Clone, Serialize)]
pub struct LecturerProfile {
    pub id: Uuid,
    pub nidn: String,
    pub nama_dosen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Lecturer> for LecturerProfile {
    fn from(l: Lecturer) -> Self {
        Self {
            id: l.id,
            nidn: l.nidn,
            nama_dosen: l.name,
            email: l.email,
        }
    }
}

/// Envelope for `GET /verify-token`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyTokenResponse {
    pub payload: LecturerProfile,
}
