//! Integration tests for the course catalog.

mod common;

use axum::http::{Method, StatusCode};
use common::{get_request_with_auth, json_request_with_auth, parse_response_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_courses() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;

    for (code, name) in [("TIK305", "Jaringan Komputer"), ("TIK201", "Basis Data")] {
        let response = app
            .send(json_request_with_auth(
                Method::POST,
                "/mata-kuliah",
                json!({ "kode_mk": code, "nama_mk": name }),
                &dosen.token,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(parse_response_body(response).await["kode_mk"], code);
    }

    let response = app.send(get_request_with_auth("/mata-kuliah", &dosen.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        parse_response_body(response).await,
        json!([
            { "kode_mk": "TIK201", "nama_mk": "Basis Data" },
            { "kode_mk": "TIK305", "nama_mk": "Jaringan Komputer" }
        ])
    );
}

#[tokio::test]
async fn test_duplicate_course_code_conflicts() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let body = json!({ "kode_mk": "TIK201", "nama_mk": "Basis Data", "sks": 3 });

    let response = app
        .send(json_request_with_auth(Method::POST, "/mata-kuliah", body.clone(), &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(parse_response_body(response).await["sks"], 3);

    let response = app
        .send(json_request_with_auth(Method::POST, "/mata-kuliah", body, &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(parse_response_body(response).await["error"], "conflict");
}

#[tokio::test]
async fn test_course_validation() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;

    let response = app
        .send(json_request_with_auth(
            Method::POST,
            "/mata-kuliah",
            json!({ "kode_mk": "", "nama_mk": "Basis Data" }),
            &dosen.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_catalog_requires_token() {
    let app = TestApp::new();

    let response = app.send(common::get_request("/mata-kuliah")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
