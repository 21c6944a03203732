//! Common test utilities for integration tests.
//!
//! The router is driven in-process against the in-memory storage backend,
//! so no database is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use fake::{faker::name::en::Name, Fake};
use serde_json::{json, Value};
use tower::ServiceExt;

use domain::models::{Lecturer, NewLecturer};
use domain::Repositories;
use persistence::MemoryStore;
use presensi_api::app::{create_app, AppState};
use presensi_api::config::Config;
use shared::jwt::JwtConfig;
use shared::password::hash_password;

pub const TEST_JWT_SECRET: &str = "test-secret-key-that-is-long-enough";
pub const TEST_PASSWORD: &str = "rahasia-dosen-123";

/// A router wired to a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub jwt: JwtConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    /// Builds the app with config overrides such as
    /// `("attendance.enforce_session_window", "true")`.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let config = Config::load_for_test(overrides).expect("Failed to load test config");
        let repos = MemoryStore::new().repositories();
        let state =
            AppState::new(config, repos.clone(), None).expect("Failed to build app state");

        Self {
            router: create_app(state),
            repos,
            jwt: JwtConfig::with_leeway(TEST_JWT_SECRET, 3600, 0).expect("Invalid test secret"),
        }
    }

    /// Sends one request through the router.
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Creates a lecturer with [`TEST_PASSWORD`] and a bearer token for it.
    pub async fn create_lecturer(&self, nidn: &str) -> TestLecturer {
        let lecturer = self
            .repos
            .lecturers
            .create(NewLecturer {
                nidn: nidn.to_string(),
                name: Name().fake(),
                email: Some(format!("{nidn}@kampus.ac.id")),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
            })
            .await
            .expect("Failed to create lecturer");

        let token = self
            .jwt
            .generate_access_token(lecturer.id, &lecturer.nidn)
            .unwrap()
            .token;

        TestLecturer { lecturer, token }
    }

    /// Creates a session through the API and returns its JSON.
    pub async fn create_session(&self, token: &str, body: Value) -> Value {
        let response = self
            .send(json_request_with_auth(Method::POST, "/jadwal", body, token))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        parse_response_body(response).await
    }

    /// Creates a session running from an hour ago to an hour from now.
    pub async fn create_running_session(&self, token: &str, course_code: &str) -> Value {
        let now = Utc::now();
        self.create_session(
            token,
            session_body(course_code, now - Duration::hours(1), now + Duration::hours(1)),
        )
        .await
    }

    /// Submits a student check-in.
    pub async fn check_in(&self, token_qr: &str, nim: &str) -> axum::response::Response {
        let student: String = Name().fake();
        self.send(json_request(
            Method::POST,
            "/presensi",
            json!({ "token_qr": token_qr, "nim": nim, "nama_mahasiswa": student }),
        ))
        .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A seeded lecturer and a valid access token.
pub struct TestLecturer {
    pub lecturer: Lecturer,
    pub token: String,
}

/// Session create payload with the given window.
pub fn session_body(course_code: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "kode_mk": course_code,
        "nama_mk": "Basis Data",
        "jam_mulai": start.to_rfc3339(),
        "jam_selesai": end.to_rfc3339(),
        "deskripsi": "Pertemuan 1",
        "jumlah": 40
    })
}

/// Build a JSON request without authentication.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request with authentication.
pub fn json_request_with_auth(method: Method, uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a bodyless request with authentication.
pub fn request_with_auth(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request with authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    request_with_auth(Method::GET, uri, token)
}

/// Build a GET request without authentication.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
