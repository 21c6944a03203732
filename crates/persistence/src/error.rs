//! Translation of driver errors into domain errors.

use domain::DomainError;

/// Maps an sqlx error onto the domain taxonomy.
///
/// Unique violations become `Conflict`, foreign key violations `NotFound`
/// and check violations `Validation`. Anything else is a storage failure.
pub fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::RowNotFound => DomainError::not_found("Resource"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => DomainError::Conflict(conflict_message(db_err.constraint())),
            Some("23503") => DomainError::not_found("Referenced resource"),
            Some("23514") => DomainError::Validation(format!(
                "Constraint {} violated",
                db_err.constraint().unwrap_or("check")
            )),
            _ => {
                tracing::error!(error = %db_err, "Unexpected database error");
                DomainError::Storage(db_err.to_string())
            }
        },
        other => {
            tracing::error!(error = %other, "Database operation failed");
            DomainError::Storage(other.to_string())
        }
    }
}

fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("courses_pkey") => "Course code already exists".into(),
        Some("sessions_token_key") => "Session token already in use".into(),
        Some("lecturers_nidn_key") => "NIDN already registered".into(),
        Some("idx_lecturers_email_lower") => "Email already registered".into(),
        _ => "Resource already exists".into(),
    }
}
