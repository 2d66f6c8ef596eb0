//! End-to-end tests driving the full router through tower's `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use drivebox_api::build_app;
use drivebox_core::config::AppConfig;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

async fn test_app(dir: &tempfile::TempDir) -> Router {
    let mut config = AppConfig::default();
    config.storage.root_path = dir.path().to_str().unwrap().to_string();
    config.upload.max_file_size_bytes = 1024 * 1024;
    build_app(config).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart_request(uri: &str, token: &str, files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; \
             filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

async fn register(app: &Router, username: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "username": username, "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn upload(app: &Router, token: &str, files: &[(&str, &str)]) -> Value {
    let response = app
        .clone()
        .oneshot(multipart_request("/api/files/upload", token, files))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn health_needs_no_auth() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let response = app.oneshot(get_request("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "OK");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/files", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_request("/api/files", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    register(&app, "alice", "alice@example.com").await;

    // A second registration under the same email fails.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "username": "alice2", "email": "alice@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_classifies_and_lists() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    let body = upload(
        &app,
        &token,
        &[("report.pdf", "pdf bytes"), ("PHOTO.JPG", "jpg bytes")],
    )
    .await;
    let uploaded = body["data"]["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);
    assert_eq!(uploaded[0]["category"], "documents");
    assert_eq!(uploaded[1]["category"], "images");

    let response = app
        .clone()
        .oneshot(get_request("/api/files?category=images", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["original_name"], "PHOTO.JPG");

    let response = app
        .oneshot(get_request("/api/files?q=report", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_uploads_register_once() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    upload(&app, &token, &[("a.txt", "v1")]).await;
    let body = upload(&app, &token, &[("a.txt", "v2"), ("b.txt", "x")]).await;

    assert_eq!(
        body["data"]["duplicates"],
        json!([{ "name": "a.txt", "existing_file": "a.txt" }])
    );
    assert_eq!(body["data"]["uploaded"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(get_request("/api/files", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn oversized_files_are_rejected_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    // One byte over the configured 1 MiB cap.
    let big = "x".repeat(1024 * 1024 + 1);
    let body = upload(&app, &token, &[("big.bin", &big), ("ok.txt", "fits")]).await;

    let rejected = body["data"]["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["name"], "big.bin");
    let uploaded = body["data"]["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0]["original_name"], "ok.txt");

    // Nothing of the oversized file is retained.
    let response = app
        .oneshot(get_request("/api/files", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["original_name"], "ok.txt");
}

#[tokio::test]
async fn download_streams_original_content() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    let body = upload(&app, &token, &[("notes.txt", "hello drivebox")]).await;
    let id = body["data"]["uploaded"][0]["id"].as_u64().unwrap();

    let response = app
        .oneshot(get_request(
            &format!("/api/files/download/{id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("notes.txt"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"hello drivebox");
}

#[tokio::test]
async fn foreign_files_are_invisible() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    let body = upload(&app, &alice, &[("secret.pdf", "classified")]).await;
    let id = body["data"]["uploaded"][0]["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/files/download/{id}"), Some(&bob)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/files/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {bob}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice still sees her file.
    let response = app
        .oneshot(get_request(
            &format!("/api/files/download/{id}"),
            Some(&alice),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_frees_the_name() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    let body = upload(&app, &token, &[("a.txt", "v1")]).await;
    let id = body["data"]["uploaded"][0]["id"].as_u64().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/files/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = upload(&app, &token, &[("a.txt", "v2")]).await;
    let uploaded = body["data"]["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);
    assert!(uploaded[0]["id"].as_u64().unwrap() > id);
}

#[tokio::test]
async fn share_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    let body = upload(&app, &token, &[("report.pdf", "pdf bytes")]).await;
    let id = body["data"]["uploaded"][0]["id"].as_u64().unwrap();

    // Unknown permission values are rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/files/{id}/share"),
            Some(&token),
            json!({ "permissions": "admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/files/{id}/share"),
            Some(&token),
            json!({ "permissions": "view" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let share_token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(
        body["data"]["share_url"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/shared/{share_token}"))
    );

    // The public endpoint serves the file without authentication.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/shared/{share_token}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"pdf bytes");

    // A tampered token is a generic 404.
    let mut tampered = share_token.clone();
    tampered.push('x');
    let response = app
        .clone()
        .oneshot(get_request(&format!("/shared/{tampered}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Re-minting invalidates the previous token.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/files/{id}/share"),
            Some(&token),
            json!({ "permissions": "download" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let new_token = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(new_token, share_token);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/shared/{share_token}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_request(&format!("/shared/{new_token}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
}

#[tokio::test]
async fn stats_aggregate_per_owner() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    upload(
        &app,
        &alice,
        &[("a.pdf", "12345"), ("b.pdf", "123"), ("c.jpg", "12")],
    )
    .await;
    upload(&app, &bob, &[("huge.zip", "0000000000")]).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/stats", Some(&alice)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["data"]["total_files"], 3);
    assert_eq!(body["data"]["total_size"], 10);
    assert_eq!(body["data"]["categories"]["documents"]["count"], 2);
    assert_eq!(body["data"]["categories"]["documents"]["size"], 8);
    assert_eq!(body["data"]["categories"]["images"]["count"], 1);
    assert_eq!(body["data"]["recent"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn categories_endpoint_counts_per_owner() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;
    let token = register(&app, "alice", "alice@example.com").await;

    upload(&app, &token, &[("a.jpg", "x"), ("b.jpg", "y"), ("c.pdf", "z")]).await;

    let response = app
        .oneshot(get_request("/api/categories", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let counts = body["data"].as_object().unwrap();
    assert_eq!(counts.len(), 9);
    assert_eq!(counts["images"], 2);
    assert_eq!(counts["documents"], 1);
    assert_eq!(counts["videos"], 0);
}
