//! Integration tests for gflash-server API endpoints
//!
//! Tests cover:
//! - `GET /songs` returning the catalog file contents as authored
//! - 500 responses for unreadable and malformed catalogs
//! - Catalog re-read on every request
//! - Single-origin CORS
//! - Health endpoint

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use gflash_server::{build_router, AppState, RouterOptions};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const SONG_A_CATALOG: &str =
    r#"[{"id":1,"name":"Song A","audio":"a.mp3","timings":[5,10,15]}]"#;

/// Test helper: Write a catalog file into a fresh temp directory
fn write_catalog(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("music.json");
    std::fs::write(&path, content).expect("Should write catalog");
    (dir, path)
}

/// Test helper: Create app with default options
fn setup_app(catalog_path: &Path) -> axum::Router {
    build_router(AppState::new(catalog_path), &RouterOptions::default())
}

/// Test helper: Create GET request
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Catalog Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_songs_returns_catalog() {
    let (_dir, path) = write_catalog(
        r#"[{"id":1,"name":"Song A","audio":"a.mp3","timings":[5,10,15],"artist":"X"}]"#,
    );
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!([{"id": 1, "name": "Song A", "audio": "a.mp3", "timings": [5, 10, 15], "artist": "X"}])
    );
    // Integer timings stay integers
    assert!(body[0]["timings"][0].is_u64());
}

#[tokio::test]
async fn test_songs_serves_loosely_shaped_records() {
    let (_dir, path) = write_catalog(
        r#"[{"id":1.5,"name":"A","audio":"a.mp3","timings":null},{"id":"b","name":"B","audio":"b.mp3"}]"#,
    );
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["id"], 1.5);
    assert!(body[0]["timings"].is_null());
    assert_eq!(body[1]["id"], "b");
    assert!(body[1].get("timings").is_none());
}

#[tokio::test]
async fn test_songs_preserves_catalog_order() {
    let (_dir, path) = write_catalog(
        r#"[
            {"id":3,"name":"C","audio":"c.mp3","timings":[]},
            {"id":1,"name":"A","audio":"a.mp3","timings":[1]},
            {"id":2,"name":"B","audio":"b.mp3","timings":[2]}
        ]"#,
    );
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/songs")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_unreadable_catalog_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(&dir.path().join("missing.json"));

    let response = app.oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Erro ao ler as músicas"}));
}

#[tokio::test]
async fn test_malformed_catalog_returns_500() {
    let (_dir, path) = write_catalog(r#"[{"id":1,"name":"Song A""#);
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Erro ao processar as músicas"}));
}

#[tokio::test]
async fn test_catalog_reread_per_request() {
    let (_dir, path) = write_catalog(SONG_A_CATALOG);
    let app = setup_app(&path);

    let response = app.clone().oneshot(get_request("/songs")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    std::fs::write(
        &path,
        r#"[{"id":1,"name":"A","audio":"a.mp3"},{"id":2,"name":"B","audio":"b.mp3"}]"#,
    )
    .unwrap();

    let response = app.clone().oneshot(get_request("/songs")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Server keeps serving after the file breaks
    std::fs::remove_file(&path).unwrap();
    let response = app.clone().oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    std::fs::write(&path, SONG_A_CATALOG).unwrap();
    let response = app.oneshot(get_request("/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// CORS Tests
// =============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (_dir, path) = write_catalog(SONG_A_CATALOG);
    let app = setup_app(&path);

    let request = Request::builder()
        .method("GET")
        .uri("/songs")
        .header(header::ORIGIN, "https://jlucassp.github.io")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://jlucassp.github.io"
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let (_dir, path) = write_catalog(SONG_A_CATALOG);
    let app = setup_app(&path);

    let request = Request::builder()
        .method("GET")
        .uri("/songs")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

// =============================================================================
// Health & Assets Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, path) = write_catalog(SONG_A_CATALOG);
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "gflash-server");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_assets_dir_serves_audio_files() {
    let (dir, path) = write_catalog(SONG_A_CATALOG);
    std::fs::create_dir(dir.path().join("songs")).unwrap();
    std::fs::write(dir.path().join("songs").join("a.mp3"), b"ID3fake").unwrap();

    let options = RouterOptions {
        assets_dir: Some(dir.path().to_path_buf()),
        ..RouterOptions::default()
    };
    let app = build_router(AppState::new(&path), &options);

    let response = app.clone().oneshot(get_request("/songs/a.mp3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ID3fake");

    let response = app.oneshot(get_request("/songs/missing.mp3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path_without_assets_is_404() {
    let (_dir, path) = write_catalog(SONG_A_CATALOG);
    let app = setup_app(&path);

    let response = app.oneshot(get_request("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
