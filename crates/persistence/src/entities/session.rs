//! Session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Session;

/// Database row mapping for the sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub instructor_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub description: Option<String>,
    pub headcount: i32,
    pub token: String,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SessionEntity> for Session {
    fn from(entity: SessionEntity) -> Self {
        Self {
            id: entity.id,
            course_code: entity.course_code,
            course_name: entity.course_name,
            instructor_id: entity.instructor_id,
            start: entity.starts_at,
            end: entity.ends_at,
            description: entity.description,
            headcount: entity.headcount,
            token: entity.token,
            closed_at: entity.closed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
