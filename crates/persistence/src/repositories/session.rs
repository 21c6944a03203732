//! Session repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{NewSession, Session};
use domain::repositories::SessionRepository;
use domain::DomainResult;

use crate::entities::SessionEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// PostgreSQL-backed session store.
///
/// Attendance records are removed with their session by the
/// `ON DELETE CASCADE` foreign key.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: NewSession, now: DateTime<Utc>) -> DomainResult<Session> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO sessions (course_code, course_name, instructor_id, starts_at, ends_at,
                                  description, headcount, token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(&session.course_code)
        .bind(&session.course_name)
        .bind(session.instructor_id)
        .bind(session.start)
        .bind(session.end)
        .bind(&session.description)
        .bind(session.headcount)
        .bind(&session.token)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Session>> {
        let timer = QueryTimer::new("find_session_by_id");
        let result = sqlx::query_as::<_, SessionEntity>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<Session>> {
        let timer = QueryTimer::new("find_session_by_token");
        let result =
            sqlx::query_as::<_, SessionEntity>("SELECT * FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn list(&self, instructor_id: Option<Uuid>) -> DomainResult<Vec<Session>> {
        let timer = QueryTimer::new("list_sessions");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT * FROM sessions
            WHERE ($1::uuid IS NULL OR instructor_id = $1)
            ORDER BY starts_at ASC, id ASC
            "#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn update(&self, session: &Session, now: DateTime<Utc>) -> DomainResult<Option<Session>> {
        let timer = QueryTimer::new("update_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            UPDATE sessions
            SET course_code = $2,
                course_name = $3,
                starts_at = $4,
                ends_at = $5,
                description = $6,
                headcount = $7,
                token = $8,
                closed_at = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(&session.course_code)
        .bind(&session.course_name)
        .bind(session.start)
        .bind(session.end)
        .bind(&session.description)
        .bind(session.headcount)
        .bind(&session.token)
        .bind(session.closed_at)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn delete(&self, id: i64) -> DomainResult<bool> {
        let timer = QueryTimer::new("delete_session");
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result
            .map(|done| done.rows_affected() > 0)
            .map_err(map_sqlx_error)
    }
}
