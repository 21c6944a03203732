//! Storage interface.
//!
//! Services depend on these traits only; `persistence` provides a
//! PostgreSQL implementation and an in-memory one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, Course, Lecturer, NewAttendanceRecord, NewCourse,
    NewLecturer, NewSession, Session,
};

#[async_trait]
pub trait LecturerRepository: Send + Sync {
    /// Fails with `Conflict` when the NIDN or email is taken.
    async fn create(&self, lecturer: NewLecturer) -> DomainResult<Lecturer>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Lecturer>>;

    async fn find_by_nidn(&self, nidn: &str) -> DomainResult<Option<Lecturer>>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Lecturer>>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fails with `Conflict` when the code already exists.
    async fn create(&self, course: NewCourse) -> DomainResult<Course>;

    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Course>>;

    /// All courses ordered by code.
    async fn list(&self) -> DomainResult<Vec<Course>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fails with `Conflict` when the token is already used by another session.
    async fn create(&self, session: NewSession, now: DateTime<Utc>) -> DomainResult<Session>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Session>>;

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<Session>>;

    /// Sessions ordered by start ascending, optionally restricted to one instructor.
    async fn list(&self, instructor_id: Option<Uuid>) -> DomainResult<Vec<Session>>;

    /// Writes every mutable field of `session`. Returns `None` when the row is gone.
    async fn update(&self, session: &Session, now: DateTime<Utc>) -> DomainResult<Option<Session>>;

    /// Deletes the session and its attendance records. Returns whether a row existed.
    async fn delete(&self, id: i64) -> DomainResult<bool>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Fails with `NotFound` when the referenced session does not exist.
    async fn create(
        &self,
        record: NewAttendanceRecord,
        now: DateTime<Utc>,
    ) -> DomainResult<AttendanceRecord>;

    /// Records of one session ordered by check-in time, ties broken by id.
    async fn list_by_session(&self, session_id: i64) -> DomainResult<Vec<AttendanceRecord>>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<AttendanceRecord>>;

    /// Returns `None` when no record with `id` belongs to `session_id`.
    async fn update_status(
        &self,
        session_id: i64,
        id: i64,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<AttendanceRecord>>;
}

/// The full set of storage handles a service layer needs.
#[derive(Clone)]
pub struct Repositories {
    pub lecturers: Arc<dyn LecturerRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
}
