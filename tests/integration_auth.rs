mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_email, setup_test_app, stored_token};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_success(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let response = app
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "name": "Ann Example",
                "email": email,
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["email"], email);
    assert!(body["email_verified_at"].is_null());
    // The password hash must never appear in responses.
    assert!(body.get("password").is_none());

    // Signup leaves a verification token behind.
    let token = stored_token(&pool, "verification_tokens", &email).await;
    assert_eq!(token.len(), 64);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", true).await;

    let response = app
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "name": "Ann Example",
                "email": email,
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_short_password(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "name": "Ann Example",
                "email": generate_unique_email(),
                "password": "short"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", true).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({
                "email": email,
                "password": "testpass123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body.get("access_token").is_some());
    assert_eq!(body["user"]["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_failures_look_identical(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", false).await;

    let app = setup_test_app(pool.clone()).await;

    // Unknown email, wrong password, and unverified account all return the
    // same status and body.
    let cases = [
        ("nonexistent@test.com", "testpass123"),
        (email.as_str(), "wrongpass"),
        (email.as_str(), "testpass123"),
    ];

    let mut bodies = Vec::new();
    for (login_email, password) in cases {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                json!({
                    "email": login_email,
                    "password": password
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(json_body(response).await);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_invalid_email_format(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({
                "email": "not-an-email",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_email_and_login_status(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", false).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/check-email", json!({ "email": email })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["exists"], true);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/check-email",
            json!({ "email": "nobody@test.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["exists"], false);

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/login-status", json!({ "email": email })))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["status"], "unverified");

    let response = app
        .oneshot(post_json(
            "/api/auth/login-status",
            json!({ "email": "nobody@test.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["status"], "no_account");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_email_verification_flow(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "name": "Ann Example",
                "email": email,
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = stored_token(&pool, "verification_tokens", &email).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/verify-email", json!({ "token": &token })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(!body["email_verified_at"].is_null());

    // Login now succeeds.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({
                "email": email,
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The token was consumed and cannot be replayed.
    let remaining = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM verification_tokens WHERE identifier = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(remaining, 0);

    let response = app
        .oneshot(post_json("/api/auth/verify-email", json!({ "token": token })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "token_invalid");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_response_is_uniform(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", true).await;

    let app = setup_test_app(pool.clone()).await;

    let known = app
        .clone()
        .oneshot(post_json("/api/auth/forgot-password", json!({ "email": email })))
        .await
        .unwrap();
    let unknown = app
        .oneshot(post_json(
            "/api/auth/forgot-password",
            json!({ "email": "nobody@test.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    assert_eq!(json_body(known).await, json_body(unknown).await);

    // But only the real account got a token.
    let token = stored_token(&pool, "password_reset_tokens", &email).await;
    assert_eq!(token.len(), 64);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_reset_flow(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "oldpass123", true).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/forgot-password", json!({ "email": email })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = stored_token(&pool, "password_reset_tokens", &email).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/reset-password",
            json!({
                "token": token,
                "password": "newpass123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password rejected, new accepted.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "oldpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
