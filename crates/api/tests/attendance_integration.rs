//! Integration tests for student check-in and roster management.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{
    get_request_with_auth, json_request, json_request_with_auth, parse_response_body,
    request_with_auth, session_body, TestApp,
};
use serde_json::json;

#[tokio::test]
async fn test_check_in_appears_on_roster() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let session = app.create_running_session(&dosen.token, "TIK201").await;
    let id = session["id"].as_i64().unwrap();
    let token_qr = session["token_qr"].as_str().unwrap();

    let before = Utc::now();
    let response = app
        .send(json_request(
            Method::POST,
            "/presensi",
            json!({
                "token_qr": token_qr,
                "nim": "S1",
                "nama_mahasiswa": "Budi",
                "lat": -6.2,
                "lng": 106.8
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let record = parse_response_body(response).await;
    assert_eq!(record["jadwal_id"], id);
    assert_eq!(record["nim"], "S1");
    assert_eq!(record["nama_mahasiswa"], "Budi");
    assert_eq!(record["status"], "Hadir");
    assert_eq!(record["lat"], -6.2);

    let response = app
        .send(get_request_with_auth(&format!("/presensi/jadwal/{id}"), &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let roster = parse_response_body(response).await;
    let roster = roster.as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["nim"], "S1");
    let waktu = chrono::DateTime::parse_from_rfc3339(roster[0]["waktu"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(waktu >= before && waktu <= Utc::now());
}

#[tokio::test]
async fn test_roster_is_exact_and_ordered() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let first = app.create_running_session(&dosen.token, "TIK201").await;
    let second = app.create_running_session(&dosen.token, "TIK202").await;

    for nim in ["S1", "S2", "S3"] {
        let response = app.check_in(first["token_qr"].as_str().unwrap(), nim).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app.check_in(second["token_qr"].as_str().unwrap(), "S9").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let id = first["id"].as_i64().unwrap();
    let response = app
        .send(get_request_with_auth(&format!("/presensi/jadwal/{id}"), &dosen.token))
        .await;
    let roster = parse_response_body(response).await;
    let nims: Vec<_> = roster
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["nim"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(nims, vec!["S1", "S2", "S3"]);
}

#[tokio::test]
async fn test_check_in_with_unknown_token() {
    let app = TestApp::new();

    let response = app.check_in("QR-0-nothing", "S1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_response_body(response).await["error"], "not_found");
}

#[tokio::test]
async fn test_check_in_validation() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let session = app.create_running_session(&dosen.token, "TIK201").await;
    let token_qr = session["token_qr"].as_str().unwrap();

    let response = app
        .send(json_request(
            Method::POST,
            "/presensi",
            json!({
                "token_qr": token_qr,
                "nim": "S1",
                "nama_mahasiswa": "Budi",
                "lat": 91.0,
                "lng": 106.8
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .send(json_request(
            Method::POST,
            "/presensi",
            json!({ "token_qr": token_qr, "nim": "S1", "nama_mahasiswa": "Budi", "lat": -6.2 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .send(json_request(
            Method::POST,
            "/presensi",
            json!({ "token_qr": token_qr, "nim": "   ", "nama_mahasiswa": "Budi" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .send(json_request(
            Method::POST,
            "/presensi",
            json!({ "token_qr": token_qr, "nim": "S1" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("nama_mahasiswa"));

    let id = session["id"].as_i64().unwrap();
    let response = app
        .send(get_request_with_auth(&format!("/presensi/jadwal/{id}"), &dosen.token))
        .await;
    assert_eq!(parse_response_body(response).await, json!([]));
}

#[tokio::test]
async fn test_late_check_in_accepted_by_default() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;

    let now = Utc::now();
    let session = app
        .create_session(
            &dosen.token,
            session_body("TIK201", now - Duration::hours(3), now - Duration::hours(1)),
        )
        .await;
    assert_eq!(session["status"], "finished");

    let response = app.check_in(session["token_qr"].as_str().unwrap(), "S1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_window_enforcement_rejects_finished_session() {
    let app = TestApp::with_overrides(&[("attendance.enforce_session_window", "true")]);
    let dosen = app.create_lecturer("0011223344").await;

    let now = Utc::now();
    let finished = app
        .create_session(
            &dosen.token,
            session_body("TIK201", now - Duration::hours(3), now - Duration::hours(1)),
        )
        .await;
    let response = app.check_in(finished["token_qr"].as_str().unwrap(), "S1").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let running = app.create_running_session(&dosen.token, "TIK202").await;
    let response = app.check_in(running["token_qr"].as_str().unwrap(), "S1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let id = running["id"].as_i64().unwrap();
    let response = app
        .send(request_with_auth(Method::POST, &format!("/jadwal/{id}/close"), &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.check_in(running["token_qr"].as_str().unwrap(), "S2").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_session_empties_roster() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let session = app.create_running_session(&dosen.token, "TIK201").await;
    let id = session["id"].as_i64().unwrap();
    let token_qr = session["token_qr"].as_str().unwrap();

    app.check_in(token_qr, "S1").await;
    app.check_in(token_qr, "S2").await;

    let response = app
        .send(request_with_auth(Method::DELETE, &format!("/jadwal/{id}"), &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(get_request_with_auth(&format!("/presensi/jadwal/{id}"), &dosen.token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining = app.repos.attendance.list_by_session(id).await.unwrap();
    assert!(remaining.is_empty());

    // The token died with the session.
    let response = app.check_in(token_qr, "S3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_override_is_visible_on_roster_and_summary() {
    let app = TestApp::new();
    let dosen = app.create_lecturer("0011223344").await;
    let session = app
        .create_session(
            &dosen.token,
            json!({
                "kode_mk": "TIK201",
                "nama_mk": "Basis Data",
                "jam_mulai": (Utc::now() - Duration::hours(1)).to_rfc3339(),
                "jam_selesai": (Utc::now() + Duration::hours(1)).to_rfc3339(),
                "jumlah": 30
            }),
        )
        .await;
    let id = session["id"].as_i64().unwrap();
    let token_qr = session["token_qr"].as_str().unwrap();

    let record = parse_response_body(app.check_in(token_qr, "S1").await).await;
    app.check_in(token_qr, "S2").await;
    let presensi_id = record["presensi_id"].as_i64().unwrap();

    let response = app
        .send(json_request_with_auth(
            Method::PATCH,
            &format!("/presensi/jadwal/{id}/{presensi_id}"),
            json!({ "status": "Sakit" }),
            &dosen.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["status"], "Sakit");

    let response = app
        .send(get_request_with_auth(&format!("/presensi/jadwal/{id}"), &dosen.token))
        .await;
    let roster = parse_response_body(response).await;
    assert_eq!(roster[0]["nim"], "S1");
    assert_eq!(roster[0]["status"], "Sakit");
    assert_eq!(roster[1]["status"], "Hadir");

    let response = app
        .send(get_request_with_auth(
            &format!("/presensi/jadwal/{id}/summary"),
            &dosen.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let summary = parse_response_body(response).await;
    assert_eq!(summary["jadwal_id"], id);
    assert_eq!(summary["jumlah"], 30);
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["hadir"], 1);
    assert_eq!(summary["sakit"], 1);
    assert_eq!(summary["izin"], 0);
    assert_eq!(summary["alpha"], 0);
}

#[tokio::test]
async fn test_status_override_rules() {
    let app = TestApp::new();
    let owner = app.create_lecturer("0011223344").await;
    let other = app.create_lecturer("0055667788").await;
    let session = app.create_running_session(&owner.token, "TIK201").await;
    let id = session["id"].as_i64().unwrap();

    let record =
        parse_response_body(app.check_in(session["token_qr"].as_str().unwrap(), "S1").await).await;
    let uri = format!("/presensi/jadwal/{id}/{}", record["presensi_id"]);

    let response = app
        .send(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "status": "Izin" }),
            &other.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "status": "Terlambat" }),
            &owner.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers()[axum::http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(parse_response_body(response).await["error"], "validation_error");

    let response = app
        .send(json_request_with_auth(
            Method::PATCH,
            &format!("/presensi/jadwal/{id}/999"),
            json!({ "status": "Alpha" }),
            &owner.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "status": "absent" }),
            &owner.token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["status"], "Alpha");
}

#[tokio::test]
async fn test_roster_requires_token() {
    let app = TestApp::new();

    let response = app.send(common::get_request("/presensi/jadwal/1")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
