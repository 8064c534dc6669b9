use super::*;
use crate::bundler::test_helpers::{StubFetcher, archive_entries, create_stub_bundler, test_config};
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;


/// Router over a bundler backed by `fetcher`
fn test_app(config: Config, fetcher: StubFetcher) -> Router {
    let (bundler, _) = create_stub_bundler(config.clone(), fetcher);
    create_router(Arc::new(bundler), Arc::new(config))
}

/// Send one request through a clone of the router
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

/// Create a task and return its id
async fn create(app: &Router) -> String {
    let (status, _, body) = send(app, "POST", "/tasks", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json(&body)["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_api_server_serves_and_shuts_down_gracefully() {
    let mut config = test_config(3, 3, &[".png"]);
    config.service.address = "127.0.0.1".to_string();
    config.service.port = 0; // OS assigns a free port
    let config = Arc::new(config);
    let bundler = Arc::new(Bundler::with_fetcher(
        (*config).clone(),
        Arc::new(StubFetcher::new()),
    ));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(start_api_server(bundler, config, async move {
        let _ = rx.await;
    }));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let app = test_app(test_config(3, 3, &[".png"]), StubFetcher::new());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = test_config(3, 3, &[".png"]);
    config.api.cors_enabled = false;
    let app = test_app(config, StubFetcher::new());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let mut config = test_config(3, 3, &[".png"]);
    config.api.cors_origins = vec!["http://allowed.example".to_string()];
    let app = test_app(config, StubFetcher::new());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://allowed.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://allowed.example")
    );

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://other.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_exposes_download_filename_and_skips_invalid_origins() {
    let mut config = test_config(3, 3, &[".png"]);
    config.api.cors_origins = vec![
        "http://allowed.example".to_string(),
        "bad\norigin".to_string(),
    ];
    let app = test_app(config, StubFetcher::new());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://allowed.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(exposed.contains("content-disposition"), "{exposed}");
}
