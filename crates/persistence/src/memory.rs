//! In-memory storage adapter.
//!
//! One `MemoryStore` implements every repository trait over a single
//! lock-protected state, so the relational rules of the PostgreSQL schema
//! (unique keys, the session foreign key, cascade delete) hold across
//! repositories. Used by the test suite and by `storage.backend = "memory"`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::models::{
    AttendanceRecord, AttendanceStatus, Course, Lecturer, NewAttendanceRecord, NewCourse,
    NewLecturer, NewSession, Session,
};
use domain::repositories::{
    AttendanceRepository, CourseRepository, LecturerRepository, SessionRepository,
};
use domain::{DomainError, DomainResult, Repositories};

#[derive(Default)]
struct State {
    lecturers: BTreeMap<Uuid, Lecturer>,
    courses: BTreeMap<String, Course>,
    sessions: BTreeMap<i64, Session>,
    attendance: BTreeMap<i64, AttendanceRecord>,
    last_session_id: i64,
    last_attendance_id: i64,
}

impl State {
    fn token_taken(&self, token: &str, except: Option<i64>) -> bool {
        self.sessions
            .values()
            .any(|s| s.token == token && Some(s.id) != except)
    }
}

/// Shared in-memory store. Cloning yields another handle to the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps this store as a full repository set.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            lecturers: Arc::new(self.clone()),
            courses: Arc::new(self.clone()),
            sessions: Arc::new(self.clone()),
            attendance: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl LecturerRepository for MemoryStore {
    async fn create(&self, lecturer: NewLecturer) -> DomainResult<Lecturer> {
        let mut state = self.state.write().await;

        if state.lecturers.values().any(|l| l.nidn == lecturer.nidn) {
            return Err(DomainError::Conflict("NIDN already registered".into()));
        }
        if let Some(email) = &lecturer.email {
            let taken = state.lecturers.values().any(|l| {
                l.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            });
            if taken {
                return Err(DomainError::Conflict("Email already registered".into()));
            }
        }

        let created = Lecturer {
            id: Uuid::new_v4(),
            nidn: lecturer.nidn,
            name: lecturer.name,
            email: lecturer.email,
            password_hash: lecturer.password_hash,
            created_at: Utc::now(),
        };
        state.lecturers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Lecturer>> {
        Ok(self.state.read().await.lecturers.get(&id).cloned())
    }

    async fn find_by_nidn(&self, nidn: &str) -> DomainResult<Option<Lecturer>> {
        let state = self.state.read().await;
        Ok(state.lecturers.values().find(|l| l.nidn == nidn).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Lecturer>> {
        let state = self.state.read().await;
        Ok(state
            .lecturers
            .values()
            .find(|l| {
                l.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .cloned())
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn create(&self, course: NewCourse) -> DomainResult<Course> {
        let mut state = self.state.write().await;
        if state.courses.contains_key(&course.code) {
            return Err(DomainError::Conflict("Course code already exists".into()));
        }

        let created = Course {
            code: course.code,
            name: course.name,
            credits: course.credits,
            created_at: Utc::now(),
        };
        state.courses.insert(created.code.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Course>> {
        Ok(self.state.read().await.courses.get(code).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Course>> {
        // BTreeMap iterates in code order.
        Ok(self.state.read().await.courses.values().cloned().collect())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, session: NewSession, now: DateTime<Utc>) -> DomainResult<Session> {
        let mut state = self.state.write().await;
        if state.token_taken(&session.token, None) {
            return Err(DomainError::Conflict("Session token already in use".into()));
        }

        state.last_session_id += 1;
        let created = Session {
            id: state.last_session_id,
            course_code: session.course_code,
            course_name: session.course_name,
            instructor_id: session.instructor_id,
            start: session.start,
            end: session.end,
            description: session.description,
            headcount: session.headcount,
            token: session.token,
            closed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.sessions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Session>> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state.sessions.values().find(|s| s.token == token).cloned())
    }

    async fn list(&self, instructor_id: Option<Uuid>) -> DomainResult<Vec<Session>> {
        let state = self.state.read().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| instructor_id.map_or(true, |id| s.instructor_id == id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        Ok(sessions)
    }

    async fn update(&self, session: &Session, now: DateTime<Utc>) -> DomainResult<Option<Session>> {
        let mut state = self.state.write().await;
        if !state.sessions.contains_key(&session.id) {
            return Ok(None);
        }
        if state.token_taken(&session.token, Some(session.id)) {
            return Err(DomainError::Conflict("Session token already in use".into()));
        }

        let Some(stored) = state.sessions.get_mut(&session.id) else {
            return Ok(None);
        };
        let created_at = stored.created_at;
        let instructor_id = stored.instructor_id;
        *stored = Session {
            created_at,
            instructor_id,
            updated_at: now,
            ..session.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> DomainResult<bool> {
        let mut state = self.state.write().await;
        if state.sessions.remove(&id).is_none() {
            return Ok(false);
        }
        state.attendance.retain(|_, r| r.session_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn create(
        &self,
        record: NewAttendanceRecord,
        now: DateTime<Utc>,
    ) -> DomainResult<AttendanceRecord> {
        let mut state = self.state.write().await;
        if !state.sessions.contains_key(&record.session_id) {
            return Err(DomainError::not_found("Session"));
        }

        state.last_attendance_id += 1;
        let created = AttendanceRecord {
            id: state.last_attendance_id,
            session_id: record.session_id,
            student_id: record.student_id,
            student_name: record.student_name,
            checked_in_at: record.checked_in_at,
            latitude: record.latitude,
            longitude: record.longitude,
            status: record.status,
            created_at: now,
            updated_at: now,
        };
        state.attendance.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_by_session(&self, session_id: i64) -> DomainResult<Vec<AttendanceRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<AttendanceRecord> = state
            .attendance
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        // Records without a check-in time sort last, like NULLS LAST.
        records.sort_by(|a, b| match (a.checked_in_at, b.checked_in_at) {
            (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });
        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<AttendanceRecord>> {
        Ok(self.state.read().await.attendance.get(&id).cloned())
    }

    async fn update_status(
        &self,
        session_id: i64,
        id: i64,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<AttendanceRecord>> {
        let mut state = self.state.write().await;
        match state.attendance.get_mut(&id) {
            Some(record) if record.session_id == session_id => {
                record.status = status;
                record.updated_at = now;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}
