//! Course catalog repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::{Course, NewCourse};
use domain::repositories::CourseRepository;
use domain::DomainResult;

use crate::entities::CourseEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// PostgreSQL-backed course catalog.
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, course: NewCourse) -> DomainResult<Course> {
        let timer = QueryTimer::new("create_course");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (code, name, credits)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&course.code)
        .bind(&course.name)
        .bind(course.credits)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Into::into).map_err(map_sqlx_error)
    }

    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Course>> {
        let timer = QueryTimer::new("find_course_by_code");
        let result = sqlx::query_as::<_, CourseEntity>("SELECT * FROM courses WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result.map(|row| row.map(Into::into)).map_err(map_sqlx_error)
    }

    async fn list(&self) -> DomainResult<Vec<Course>> {
        let timer = QueryTimer::new("list_courses");
        let result = sqlx::query_as::<_, CourseEntity>("SELECT * FROM courses ORDER BY code ASC")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }
}
