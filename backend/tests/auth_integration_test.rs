//! Integration tests for authentication endpoints

mod common;

use axum::http::StatusCode;
use common::{unique_email, TestApp, TEST_PASSWORD, TEST_SECRET};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_login_dashboard_flow() {
    let app = TestApp::new();

    let body = json!({
        "email": "user@test.io",
        "password": "longenough1",
        "confirm_password": "longenough1",
        "role": "guest"
    });
    let res = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.json()["message"], "User created successfully");
    assert!(res.authorization.is_none());

    let res = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Email already registered");

    let res = app.login("user@test.io", "wrong").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Invalid email or password");

    let res = app.login("user@test.io", "longenough1").await;
    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    let token = json["token"].as_str().unwrap().to_string();
    assert_eq!(json["redirect"], "dashboard");
    assert_eq!(res.authorization, Some(format!("Bearer {}", token)));

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let claims = decode::<Value>(
        &token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &validation,
    )
    .unwrap()
    .claims;
    assert_eq!(claims["email"], "user@test.io");
    assert_eq!(claims["role"], "guest");
    let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
    assert_eq!(lifetime, 300);

    let res = app
        .get_auth("/api/v1/dashboard", &format!("Bearer {}", token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["email"], "user@test.io");
    assert_eq!(res.json()["role"], "guest");
}

#[tokio::test]
async fn test_admin_role_carried_in_session() {
    let app = TestApp::new();
    let email = unique_email();

    assert_eq!(app.register(&email, "admin").await.status, StatusCode::CREATED);
    let res = app.login(&email, TEST_PASSWORD).await;
    let token = res.json()["token"].as_str().unwrap().to_string();

    let res = app
        .get_auth("/api/v1/dashboard", &format!("Bearer {}", token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["role"], "admin");
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let app = TestApp::new();
    let email = unique_email();
    app.register(&email, "guest").await;

    let wrong_password = app.login(&email, "not-the-password").await;
    let unknown_email = app.login(&unique_email(), TEST_PASSWORD).await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();

    let cases = [
        json!({"email": "not-an-email", "password": "longenough1", "confirm_password": "longenough1", "role": "guest"}),
        json!({"email": "user@test.io", "password": "short", "confirm_password": "short", "role": "guest"}),
        json!({"email": "user@test.io", "password": "longenough1", "confirm_password": "longenough1", "role": "owner"}),
        json!({"email": "user@test.io", "password": "longenough1"}),
    ];

    for body in cases {
        let res = app.post("/api/v1/auth/register", &body.to_string()).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(res.json()["error"], "Invalid input data");
    }
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let app = TestApp::new();
    let body = json!({
        "email": unique_email(),
        "password": "longenough1",
        "confirm_password": "longenough2",
        "role": "guest"
    });

    let res = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Passwords do not match");
}

#[tokio::test]
async fn test_dashboard_requires_token() {
    let app = TestApp::new();

    let res = app.get("/api/v1/dashboard").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get_auth("/api/v1/dashboard", "Bearer not.a.token").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get_auth("/api/v1/dashboard", "Token abc").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_postgres_register_and_login() {
    let app = TestApp::with_postgres().await;
    let email = unique_email();

    assert_eq!(app.register(&email, "guest").await.status, StatusCode::CREATED);
    assert_eq!(app.register(&email, "admin").await.status, StatusCode::BAD_REQUEST);

    let res = app.login(&email, TEST_PASSWORD).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.authorization.unwrap().starts_with("Bearer "));

    app.cleanup().await;
}
