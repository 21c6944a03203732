//! Course catalog.

use domain::models::course::CreateCourseRequest;
use domain::models::Course;
use domain::{DomainResult, Repositories};

/// Course catalog service.
pub struct CourseService {
    repos: Repositories,
}

impl CourseService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// All catalog entries ordered by code.
    pub async fn list(&self) -> DomainResult<Vec<Course>> {
        self.repos.courses.list().await
    }

    /// Adds a course. A duplicate code is a `Conflict`.
    pub async fn create(&self, request: CreateCourseRequest) -> DomainResult<Course> {
        let course = self.repos.courses.create(request.into()).await?;
        tracing::info!(course_code = %course.code, "Course added to catalog");
        Ok(course)
    }
}
