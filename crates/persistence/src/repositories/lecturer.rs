//! Lecturer repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Lecturer, NewLecturer};
use domain::repositories::LecturerRepository;
use domain::DomainResult;

use crate::entities::LecturerEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// PostgreSQL-backed lecturer store.
#[derive(Clone)]
pub struct PgLecturerRepository {
    pool: PgPool,
}

impl PgLecturerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LecturerRepository for PgLecturerRepository {
    async fn create(&self, lecturer: NewLecturer) -> DomainResult<Lecturer> {
        let timer = QueryTimer::new("create_lecturer");
        let result = sqlx::query_as::<_, LecturerEntity>(
            r#"
            INSERT INTO lecturers (nidn, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&lecturer.nidn)
        .bind(&lecturer.name)
        .bind(&lecturer.email)
        .bind(&lecturer.password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Lecturer>> {
        let timer = QueryTimer::new("find_lecturer_by_id");
        let result = sqlx::query_as::<_, LecturerEntity>("SELECT * FROM lecturers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn find_by_nidn(&self, nidn: &str) -> DomainResult<Option<Lecturer>> {
        let timer = QueryTimer::new("find_lecturer_by_nidn");
        let result =
            sqlx::query_as::<_, LecturerEntity>("SELECT * FROM lecturers WHERE nidn = $1")
                .bind(nidn)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Lecturer>> {
        let timer = QueryTimer::new("find_lecturer_by_email");
        let result = sqlx::query_as::<_, LecturerEntity>(
            "SELECT * FROM lecturers WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }
}
