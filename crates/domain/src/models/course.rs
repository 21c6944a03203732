//! Course catalog ("mata kuliah") entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A course in the catalog. The code is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a course.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub credits: Option<i32>,
}

/// Request payload for adding a course to the catalog.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(
        length(min = 1, max = 20, message = "kode_mk must be 1-20 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub kode_mk: String,

    #[validate(
        length(min = 1, max = 150, message = "nama_mk must be 1-150 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub nama_mk: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 24, message = "sks must be between 0 and 24"))]
    pub sks: Option<i32>,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        Self {
            code: req.kode_mk.trim().to_string(),
            name: req.nama_mk.trim().to_string(),
            credits: req.sks,
        }
    }
}

/// Course as returned over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub kode_mk: String,
    pub nama_mk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sks: Option<i32>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            kode_mk: c.code,
            nama_mk: c.name,
            sks: c.credits,
        }
    }
}
