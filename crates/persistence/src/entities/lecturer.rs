//! Lecturer entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Lecturer;

/// Database row mapping for the lecturers table.
#[derive(Debug, Clone, FromRow)]
pub struct LecturerEntity {
    pub id: Uuid,
    pub nidn: String,
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<LecturerEntity> for Lecturer {
    fn from(entity: LecturerEntity) -> Self {
        Self {
            id: entity.id,
            nidn: entity.nidn,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            created_at: entity.created_at,
        }
    }
}
