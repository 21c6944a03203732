//! Course entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Course;

/// Database row mapping for the courses table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub code: String,
    pub name: String,
    pub credits: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<CourseEntity> for Course {
    fn from(entity: CourseEntity) -> Self {
        Self {
            code: entity.code,
            name: entity.name,
            credits: entity.credits,
            created_at: entity.created_at,
        }
    }
}
