//! Attendance repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::models::{AttendanceRecord, AttendanceStatus, NewAttendanceRecord};
use domain::repositories::AttendanceRepository;
use domain::{DomainError, DomainResult};

use crate::entities::AttendanceEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// PostgreSQL-backed attendance store.
#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn create(
        &self,
        record: NewAttendanceRecord,
        now: DateTime<Utc>,
    ) -> DomainResult<AttendanceRecord> {
        let timer = QueryTimer::new("create_attendance_record");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            INSERT INTO attendance_records (session_id, student_id, student_name, checked_in_at,
                                            latitude, longitude, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(record.session_id)
        .bind(&record.student_id)
        .bind(&record.student_name)
        .bind(record.checked_in_at)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(|e| match map_sqlx_error(e) {
            DomainError::NotFound(_) => DomainError::not_found("Session"),
            other => other,
        })
    }

    async fn list_by_session(&self, session_id: i64) -> DomainResult<Vec<AttendanceRecord>> {
        let timer = QueryTimer::new("list_attendance_by_session");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            SELECT * FROM attendance_records
            WHERE session_id = $1
            ORDER BY checked_in_at ASC NULLS LAST, id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<AttendanceRecord>> {
        let timer = QueryTimer::new("find_attendance_record_by_id");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            "SELECT * FROM attendance_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn update_status(
        &self,
        session_id: i64,
        id: i64,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<AttendanceRecord>> {
        let timer = QueryTimer::new("update_attendance_status");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            UPDATE attendance_records
            SET status = $3, updated_at = $4
            WHERE id = $1 AND session_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_id)
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }
}
