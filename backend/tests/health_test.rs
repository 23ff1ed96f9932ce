//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::TestApp::new();

    let res = app.get("/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("healthy"));
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = common::TestApp::new();

    let res = app.get("/health/live").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("alive"));
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let app = common::TestApp::new();

    let res = app.get("/health/ready").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("ready"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_readiness_endpoint_with_postgres() {
    let app = common::TestApp::with_postgres().await;

    let res = app.get("/health/ready").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("ready"));
}

#[tokio::test]
async fn test_api_v1_root() {
    let app = common::TestApp::new();

    let res = app.get("/api/v1/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Keygate API v1"));
}
