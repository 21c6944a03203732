//! Lecturer sign-in and token verification.

use std::sync::Arc;

use domain::models::lecturer::{LecturerProfile, LoginResponse};
use domain::models::Lecturer;
use domain::repositories::LecturerRepository;
use domain::DomainError;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Lecturer not found")]
    LecturerNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),
}

/// Authentication service.
pub struct AuthService {
    lecturers: Arc<dyn LecturerRepository>,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(lecturers: Arc<dyn LecturerRepository>, jwt: Arc<JwtConfig>) -> Self {
        Self { lecturers, jwt }
    }

    /// Signs in with the lecturer's NIDN.
    pub async fn login_by_nidn(
        &self,
        nidn: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let lecturer = self.lecturers.find_by_nidn(nidn.trim()).await?;
        self.issue_for(lecturer, password)
    }

    /// Signs in with the lecturer's email address.
    pub async fn login_by_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let lecturer = self.lecturers.find_by_email(email.trim()).await?;
        self.issue_for(lecturer, password)
    }

    /// Public profile of the lecturer a token was issued to.
    pub async fn profile(&self, lecturer_id: Uuid) -> Result<LecturerProfile, AuthError> {
        self.lecturers
            .find_by_id(lecturer_id)
            .await?
            .map(Into::into)
            .ok_or(AuthError::LecturerNotFound)
    }

    fn issue_for(
        &self,
        lecturer: Option<Lecturer>,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        // Unknown account and wrong password are indistinguishable to the caller.
        let lecturer = lecturer.ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &lecturer.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.jwt.generate_access_token(lecturer.id, &lecturer.nidn)?;
        tracing::info!(lecturer_id = %lecturer.id, jti = %issued.jti, "Lecturer signed in");

        Ok(LoginResponse {
            token: issued.token,
            expires_in: issued.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::NewLecturer;
    use persistence::MemoryStore;
    use shared::password::hash_password;

    const SECRET: &str = "auth_service_test_secret_01234";

    async fn service_with_lecturer() -> (AuthService, Lecturer) {
        let store = MemoryStore::new();
        let lecturer = store
            .create(NewLecturer {
                nidn: "0011223344".into(),
                name: "Dr. Sari".into(),
                email: Some("sari@whn.ac.id".into()),
                password_hash: hash_password("rahasia123").unwrap(),
            })
            .await
            .unwrap();

        let jwt = Arc::new(JwtConfig::with_leeway(SECRET, 3600, 0).unwrap());
        (AuthService::new(Arc::new(store), jwt), lecturer)
    }

    #[tokio::test]
    async fn test_login_by_nidn_issues_verifiable_token() {
        let (service, lecturer) = service_with_lecturer().await;
        let response = service.login_by_nidn("0011223344", "rahasia123").await.unwrap();
        assert_eq!(response.expires_in, 3600);

        let jwt = JwtConfig::with_leeway(SECRET, 3600, 0).unwrap();
        let claims = jwt.validate_token(&response.token).unwrap();
        assert_eq!(claims.sub, lecturer.id.to_string());
        assert_eq!(claims.nidn, "0011223344");
    }

    #[tokio::test]
    async fn test_login_by_email_is_case_insensitive() {
        let (service, _) = service_with_lecturer().await;
        assert!(service
            .login_by_email("SARI@whn.ac.id", "rahasia123")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_account_look_alike() {
        let (service, _) = service_with_lecturer().await;
        assert!(matches!(
            service.login_by_nidn("0011223344", "salah").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login_by_nidn("9999999999", "rahasia123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_profile() {
        let (service, lecturer) = service_with_lecturer().await;
        let profile = service.profile(lecturer.id).await.unwrap();
        assert_eq!(profile.nama_dosen, "Dr. Sari");

        assert!(matches!(
            service.profile(Uuid::new_v4()).await,
            Err(AuthError::LecturerNotFound)
        ));
    }
}
