//! Attendance record entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{AttendanceRecord, AttendanceStatus};

/// Database row mapping for the attendance_records table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: i64,
    pub session_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceEntity> for AttendanceRecord {
    fn from(entity: AttendanceEntity) -> Self {
        Self {
            id: entity.id,
            session_id: entity.session_id,
            student_id: entity.student_id,
            student_name: entity.student_name,
            checked_in_at: entity.checked_in_at,
            latitude: entity.latitude,
            longitude: entity.longitude,
            // The column has a CHECK constraint; fall back to the default anyway.
            status: AttendanceStatus::parse(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
