//! Session lifecycle: scheduling, editing, closing and deleting sessions.

use chrono::{DateTime, FixedOffset, Utc};
use domain::models::session::{
    normalize_text, validate_window, CreateSessionRequest, UpdateSessionRequest,
};
use domain::models::{NewSession, Session};
use domain::services::SessionStatus;
use domain::{DomainError, DomainResult, Repositories};
use shared::crypto::{generate_session_token, token_fingerprint};
use uuid::Uuid;

/// Session lifecycle service.
pub struct SessionService {
    repos: Repositories,
    utc_offset: FixedOffset,
}

impl SessionService {
    /// `utc_offset` resolves schedule times sent without an offset.
    pub fn new(repos: Repositories, utc_offset: FixedOffset) -> Self {
        Self { repos, utc_offset }
    }

    async fn catalog_name(&self, course_code: &str) -> DomainResult<String> {
        self.repos
            .courses
            .find_by_code(course_code)
            .await?
            .map(|course| course.name)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "nama_mk is required: course {course_code} is not in the catalog"
                ))
            })
    }

    /// Schedules a new session owned by `instructor_id`.
    ///
    /// A missing course name is looked up in the catalog; a missing token is
    /// generated.
    pub async fn create(
        &self,
        instructor_id: Uuid,
        request: CreateSessionRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Session> {
        let start = request.start.resolve(self.utc_offset);
        let end = request.end.resolve(self.utc_offset);
        validate_window(start, end)?;

        let course_code = request.course_code.trim().to_string();
        let course_name = match normalize_text(request.course_name.as_deref()) {
            Some(name) => name,
            None => self.catalog_name(&course_code).await?,
        };

        let token = normalize_text(request.token.as_deref()).unwrap_or_else(generate_session_token);

        let session = self
            .repos
            .sessions
            .create(
                NewSession {
                    course_code,
                    course_name,
                    instructor_id,
                    start,
                    end,
                    description: normalize_text(request.description.as_deref()),
                    headcount: request.headcount,
                    token,
                },
                now,
            )
            .await?;

        tracing::info!(
            session_id = session.id,
            instructor_id = %instructor_id,
            course_code = %session.course_code,
            token = %token_fingerprint(&session.token),
            "Session created"
        );
        Ok(session)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Session> {
        self.repos
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session"))
    }

    /// Sessions ordered by start time, optionally only those of one lecturer.
    pub async fn list(&self, instructor_id: Option<Uuid>) -> DomainResult<Vec<Session>> {
        self.repos.sessions.list(instructor_id).await
    }

    /// Loads a session and checks that `caller` owns it.
    pub async fn owned(&self, id: i64, caller: Uuid) -> DomainResult<Session> {
        let session = self.get(id).await?;
        if !session.is_owned_by(caller) {
            return Err(DomainError::Forbidden(
                "Only the lecturer who created this session can change it".into(),
            ));
        }
        Ok(session)
    }

    /// Overwrites the provided fields and leaves the rest untouched.
    ///
    /// Text is trimmed the same way as on create. A new `kode_mk` without a
    /// `nama_mk` takes its name from the catalog.
    pub async fn update(
        &self,
        id: i64,
        caller: Uuid,
        changes: UpdateSessionRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Session> {
        let session = self.owned(id, caller).await?;

        let mut changes = changes.into_changes(self.utc_offset);
        if let Some(code) = &changes.course_code {
            if changes.course_name.is_none() && *code != session.course_code {
                changes.course_name = Some(self.catalog_name(code).await?);
            }
        }

        let next = session.with_changes(&changes);
        validate_window(next.start, next.end)?;

        let updated = self
            .repos
            .sessions
            .update(&next, now)
            .await?
            .ok_or_else(|| DomainError::not_found("Session"))?;

        tracing::info!(session_id = id, instructor_id = %caller, "Session updated");
        Ok(updated)
    }

    /// Ends a running session at `now`.
    pub async fn close_now(&self, id: i64, caller: Uuid, now: DateTime<Utc>) -> DomainResult<Session> {
        let session = self.owned(id, caller).await?;
        match session.status_at(now) {
            SessionStatus::NotStarted => {
                return Err(DomainError::Conflict("Session has not started yet".into()))
            }
            SessionStatus::Finished => {
                return Err(DomainError::Conflict("Session has already finished".into()))
            }
            SessionStatus::InProgress => {}
        }

        let mut next = session;
        next.end = now;
        next.closed_at = Some(now);

        let closed = self
            .repos
            .sessions
            .update(&next, now)
            .await?
            .ok_or_else(|| DomainError::not_found("Session"))?;

        tracing::info!(session_id = id, instructor_id = %caller, closed_at = %now, "Session closed");
        Ok(closed)
    }

    /// Deletes a session together with its roster.
    pub async fn delete(&self, id: i64, caller: Uuid) -> DomainResult<()> {
        self.owned(id, caller).await?;
        if !self.repos.sessions.delete(id).await? {
            return Err(DomainError::not_found("Session"));
        }

        tracing::info!(session_id = id, instructor_id = %caller, "Session deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};
    use domain::models::NewCourse;
    use shared::time::ScheduleTime;
    use persistence::MemoryStore;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn request(code: &str, name: Option<&str>) -> CreateSessionRequest {
        CreateSessionRequest {
            course_code: code.into(),
            course_name: name.map(Into::into),
            start: at(10, 0).into(),
            end: at(12, 0).into(),
            description: Some("Pertemuan 1".into()),
            headcount: 40,
            token: None,
        }
    }

    fn service() -> (SessionService, MemoryStore) {
        let store = MemoryStore::new();
        (SessionService::new(store.repositories(), Utc.fix()), store)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_input() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let mut req = request("TIK201", Some("Basis Data"));
        req.token = Some("QR-1700000000000-abc123".into());

        let created = service.create(owner, req, at(8, 0)).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched.course_code, "TIK201");
        assert_eq!(fetched.course_name, "Basis Data");
        assert_eq!(fetched.instructor_id, owner);
        assert_eq!(fetched.start, at(10, 0));
        assert_eq!(fetched.end, at(12, 0));
        assert_eq!(fetched.description.as_deref(), Some("Pertemuan 1"));
        assert_eq!(fetched.headcount, 40);
        assert_eq!(fetched.token, "QR-1700000000000-abc123");
    }

    #[tokio::test]
    async fn test_create_generates_token_and_resolves_course_name() {
        let (service, store) = service();
        add_course(&store, "TIK201", "Basis Data").await;

        let created = service
            .create(Uuid::new_v4(), request("TIK201", None), at(8, 0))
            .await
            .unwrap();
        assert_eq!(created.course_name, "Basis Data");
        assert!(created.token.starts_with(shared::crypto::SESSION_TOKEN_PREFIX));
    }

    #[tokio::test]
    async fn test_create_unknown_course_without_name_is_rejected() {
        let (service, _) = service();
        let err = service
            .create(Uuid::new_v4(), request("TIK999", None), at(8, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let (service, _) = service();
        let mut req = request("TIK201", Some("Basis Data"));
        req.end = at(9, 0).into();
        assert!(matches!(
            service.create(Uuid::new_v4(), req, at(8, 0)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_end_only() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            end: Some(at(11, 30).into()),
            ..Default::default()
        };
        service.update(created.id, owner, changes, at(9, 0)).await.unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.end, at(11, 30));
        assert_eq!(fetched.start, created.start);
        assert_eq!(fetched.course_code, created.course_code);
        assert_eq!(fetched.course_name, created.course_name);
        assert_eq!(fetched.description, created.description);
        assert_eq!(fetched.headcount, created.headcount);
        assert_eq!(fetched.token, created.token);
    }

    #[tokio::test]
    async fn test_update_rejects_merged_inverted_window() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            start: Some(at(13, 0).into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(created.id, owner, changes, at(9, 0)).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(service.get(created.id).await.unwrap().start, at(10, 0));
    }

    #[tokio::test]
    async fn test_only_owner_may_mutate() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        assert!(matches!(
            service
                .update(created.id, intruder, UpdateSessionRequest::default(), at(9, 0))
                .await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(created.id, intruder).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.close_now(created.id, intruder, at(10, 30)).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        service.delete(created.id, owner).await.unwrap();
        assert_eq!(
            service.get(created.id).await.unwrap_err(),
            DomainError::not_found("Session")
        );
        assert!(matches!(
            service.delete(created.id, owner).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_close_now_finishes_session() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let closed = service.close_now(created.id, owner, at(10, 30)).await.unwrap();
        assert_eq!(closed.end, at(10, 30));
        assert_eq!(closed.status_at(at(10, 30)), SessionStatus::Finished);
        assert_eq!(closed.status_at(at(11, 45)), SessionStatus::Finished);

        assert!(matches!(
            service.close_now(created.id, owner, at(10, 31)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_close_before_start_is_conflict() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        assert!(matches!(
            service.close_now(created.id, owner, at(9, 0)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filtered_by_owner() {
        let (service, _) = service();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        service
            .create(a, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();
        service
            .create(b, request("TIK202", Some("Jaringan")), at(8, 0))
            .await
            .unwrap();

        assert_eq!(service.list(None).await.unwrap().len(), 2);
        let mine = service.list(Some(a)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].course_code, "TIK201");
    }

    async fn add_course(store: &MemoryStore, code: &str, name: &str) {
        domain::repositories::CourseRepository::create(
            store,
            NewCourse {
                code: code.into(),
                name: name.into(),
                credits: Some(3),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_trims_padded_input() {
        let (service, store) = service();
        let mut req = request(" TIK201 ", Some(" Basis Data "));
        req.token = Some("  QR-PAD  ".into());
        req.description = Some("   ".into());

        let created = service.create(Uuid::new_v4(), req, at(8, 0)).await.unwrap();
        assert_eq!(created.course_code, "TIK201");
        assert_eq!(created.course_name, "Basis Data");
        assert_eq!(created.token, "QR-PAD");
        assert!(created.description.is_none());

        let found = domain::repositories::SessionRepository::find_by_token(&store, "QR-PAD")
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_update_token_is_stored_trimmed() {
        let (service, store) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            token: Some(" QR-NEW ".into()),
            ..Default::default()
        };
        let updated = service.update(created.id, owner, changes, at(9, 0)).await.unwrap();
        assert_eq!(updated.token, "QR-NEW");

        let found = domain::repositories::SessionRepository::find_by_token(&store, "QR-NEW")
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_update_course_code_takes_catalog_name() {
        let (service, store) = service();
        add_course(&store, "TIK202", "Jaringan Komputer").await;
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            course_code: Some(" TIK202 ".into()),
            ..Default::default()
        };
        let updated = service.update(created.id, owner, changes, at(9, 0)).await.unwrap();
        assert_eq!(updated.course_code, "TIK202");
        assert_eq!(updated.course_name, "Jaringan Komputer");
    }

    #[tokio::test]
    async fn test_update_to_unknown_course_needs_name() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            course_code: Some("TIK999".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(created.id, owner, changes, at(9, 0)).await,
            Err(DomainError::Validation(_))
        ));

        let changes = UpdateSessionRequest {
            course_code: Some("TIK999".into()),
            course_name: Some("Kecerdasan Buatan".into()),
            ..Default::default()
        };
        let updated = service.update(created.id, owner, changes, at(9, 0)).await.unwrap();
        assert_eq!(updated.course_name, "Kecerdasan Buatan");
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, request("TIK201", Some("Basis Data")), at(8, 0))
            .await
            .unwrap();

        let changes = UpdateSessionRequest {
            description: Some(String::new()),
            ..Default::default()
        };
        service.update(created.id, owner, changes, at(9, 0)).await.unwrap();
        assert!(service.get(created.id).await.unwrap().description.is_none());
    }

    #[tokio::test]
    async fn test_local_times_use_configured_offset() {
        let store = MemoryStore::new();
        let wib = chrono::FixedOffset::east_opt(7 * 3600).unwrap();
        let service = SessionService::new(store.repositories(), wib);
        let owner = Uuid::new_v4();

        let mut req = request("TIK201", Some("Basis Data"));
        req.start = "2024-01-01T10:00".parse::<ScheduleTime>().unwrap();
        req.end = "2024-01-01T12:00".parse::<ScheduleTime>().unwrap();
        let created = service.create(owner, req, at(1, 0)).await.unwrap();

        assert_eq!(created.start, at(3, 0));
        assert_eq!(created.end, at(5, 0));
        assert_eq!(created.status_at(at(4, 0)), SessionStatus::InProgress);

        let changes = UpdateSessionRequest {
            end: Some("2024-01-01T11:30".parse::<ScheduleTime>().unwrap()),
            ..Default::default()
        };
        let updated = service.update(created.id, owner, changes, at(2, 0)).await.unwrap();
        assert_eq!(updated.end, at(4, 30));
    }
}
