//! Lecturer bootstrap for initial setup.
//!
//! Creates the first lecturer account on startup when configured. Running
//! it again with the same NIDN does nothing.

use domain::models::{Lecturer, NewLecturer};
use domain::repositories::LecturerRepository;
use domain::DomainError;
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Error types for lecturer bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Creates the configured lecturer unless one with that NIDN exists.
///
/// Returns the created account, or `None` when nothing was done.
pub async fn bootstrap_lecturer(
    lecturers: &dyn LecturerRepository,
    config: &BootstrapConfig,
) -> Result<Option<Lecturer>, BootstrapError> {
    let Some(nidn) = non_empty(&config.nidn) else {
        return Ok(None);
    };

    let Some(password) = non_empty(&config.password) else {
        warn!(
            "PRESENSI__BOOTSTRAP__NIDN is set but PRESENSI__BOOTSTRAP__PASSWORD is empty - skipping bootstrap"
        );
        return Ok(None);
    };

    if lecturers.find_by_nidn(nidn).await?.is_some() {
        info!(nidn = %nidn, "Bootstrap lecturer already exists - skipping bootstrap");
        return Ok(None);
    }

    let lecturer = lecturers
        .create(NewLecturer {
            nidn: nidn.to_string(),
            name: non_empty(&config.name).unwrap_or("Administrator").to_string(),
            email: non_empty(&config.email).map(str::to_lowercase),
            password_hash: hash_password(password)?,
        })
        .await?;

    info!(
        nidn = %lecturer.nidn,
        lecturer_id = %lecturer.id,
        "Bootstrap lecturer created"
    );
    warn!(
        "SECURITY: Remove PRESENSI__BOOTSTRAP__PASSWORD from configuration after initial setup"
    );

    Ok(Some(lecturer))
}
