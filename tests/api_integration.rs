//! Integration tests for the HTTP surface.
//!
//! Each test builds a fresh router with its own stores and drives it
//! in-process, covering the full pipeline: matching, the two gates,
//! and the handlers.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use lorekeeper_backend::api::create_router;
use lorekeeper_backend::auth::{AuthState, RevocationList, TokenService, UserStore};
use lorekeeper_backend::characters::CharacterStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

fn test_app() -> Router {
    let auth_state = AuthState {
        users: Arc::new(UserStore::new()),
        tokens: Arc::new(TokenService::new(TEST_SECRET.to_string(), 900, 1800)),
        revoked: Arc::new(RevocationList::new()),
    };

    create_router(auth_state, Arc::new(CharacterStore::new()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register + login, returning the access and refresh tokens.
async fn login_tokens(app: &Router, email: &str, password: &str) -> (String, String) {
    let (status, _) = register(app, email, password).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["accessToken"].as_str().unwrap().to_string(),
        body["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_register_creates_sanitized_user() {
    let app = test_app();

    let (status, body) = register(&app, "a@b.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["role"], "user");
    assert!(body["id"].is_u64());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_shapes() {
    let app = test_app();

    let (status, body) = register(&app, "not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");

    let (status, _) = register(&app, "a@b.com", "tiny").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing fields and broken JSON are the same failure to the caller.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "a@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app();

    let (status, _) = register(&app, "a@b.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "a@b.com", "secret2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_login_returns_distinct_tokens() {
    let app = test_app();

    let (access, refresh) = login_tokens(&app, "a@b.com", "secret1").await;
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app();
    register(&app, "a@b.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "a@b.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid Email or Password");

    // Unknown email is indistinguishable from a wrong password.
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ghost@b.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid Email or Password");
}

#[tokio::test]
async fn test_characters_require_authentication() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/characters", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, body) = send(&app, Method::GET, "/characters", Some("garbage.token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn test_character_crud_round_trip() {
    let app = test_app();
    let (access, _) = login_tokens(&app, "a@b.com", "secret1").await;
    let token = Some(access.as_str());

    let (status, body) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, created) = send(
        &app,
        Method::POST,
        "/characters",
        token,
        Some(json!({ "name": "Aragorn", "lastname": "Elessar" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Aragorn");
    let id = created["id"].as_u64().unwrap();

    let (status, body) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("/characters/{}", id);
    let (status, body) = send(&app, Method::GET, &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastname"], "Elessar");

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        token,
        Some(json!({ "name": "Strider" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Strider");
    assert_eq!(updated["lastname"], "Elessar");

    let (status, body) = send(&app, Method::DELETE, &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &uri, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Character not found");
}

#[tokio::test]
async fn test_character_validation_reports_issues() {
    let app = test_app();
    let (access, _) = login_tokens(&app, "a@b.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/characters",
        Some(access.as_str()),
        Some(json!({ "name": "Al" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Both the short name and the missing lastname show up as issues.
    let issues = &body["message"];
    assert!(issues.get("name").is_some());
    assert!(issues.get("lastname").is_some());
}

#[tokio::test]
async fn test_unknown_character_ids_are_not_found() {
    let app = test_app();
    let (access, _) = login_tokens(&app, "a@b.com", "secret1").await;
    let token = Some(access.as_str());

    let (status, body) = send(&app, Method::GET, "/characters/999999", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Character not found");

    // Non-numeric ids name no character rather than being a protocol error.
    let (status, _) = send(&app, Method::GET, "/characters/gimli", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/characters/999999",
        token,
        Some(json!({ "name": "Nobody!" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Character Not Found!");

    let (status, body) = send(&app, Method::DELETE, "/characters/999999", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Character Not Found!");
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    let app = test_app();
    let (access, _) = login_tokens(&app, "a@b.com", "secret1").await;
    let token = Some(access.as_str());

    let (status, body) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::POST, "/auth/logout", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    // The token is still signature-valid and unexpired, but the gate
    // rejects it on the revocation check alone.
    let verifier = TokenService::new(TEST_SECRET.to_string(), 900, 1800);
    assert!(verifier.verify_access_token(&access).is_ok());

    let (status, body) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");

    // Logging out twice is as good as once.
    let (status, _) = send(&app, Method::POST, "/auth/logout", token, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_without_token_misses() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Endpoint Not Found");
}

#[tokio::test]
async fn test_unmatched_routes_fall_through() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Endpoint Not Found");

    // An unsupported method on a known path is also an unmatched route.
    let (status, body) = send(&app, Method::PUT, "/auth/login", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Endpoint Not Found");
}

#[tokio::test]
async fn test_characters_authenticate_before_method_matching() {
    let app = test_app();

    // Unknown method under /characters still hits the gate first.
    let (status, _) = send(&app, Method::PUT, "/characters", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (access, _) = login_tokens(&app, "a@b.com", "secret1").await;
    let (status, body) = send(&app, Method::PUT, "/characters", Some(access.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Endpoint Not Found");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_full_session_scenario() {
    let app = test_app();

    let (status, _) = register(&app, "a@b.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "a@b.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["accessToken"].as_str().unwrap().to_string();
    let token = Some(access.as_str());

    let (status, _) = send(&app, Method::GET, "/characters", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/characters",
        token,
        Some(json!({ "name": "Aragorn", "lastname": "Elessar" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::POST, "/auth/logout", token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/characters", token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
