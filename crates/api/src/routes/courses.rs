//! Course catalog ("mata kuliah") routes.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use domain::models::course::{CourseResponse, CreateCourseRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::services::CourseService;

/// GET /mata-kuliah
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = CourseService::new(state.repos.clone()).list().await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// POST /mata-kuliah
pub async fn create_course(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    request.validate()?;

    let course = CourseService::new(state.repos.clone())
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}
