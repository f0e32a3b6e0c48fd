/// Integration tests for the Atlas API
///
/// These tests run the full router without a live database and cover:
/// - Health reporting when the database is down
/// - Request validation on the auth endpoints
/// - Bearer-token enforcement on protected routes
/// - OAuth configuration handling

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;

/// Health answers 200 with a degraded status when the database is down
#[tokio::test]
async fn test_health_degraded_without_database() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert!(body["version"].is_string());
}

/// Registration rejects a malformed email before touching the database
#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ada",
                "email": "not-an-email",
                "password": "pw123456"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
}

/// Registration rejects an empty password
#[tokio::test]
async fn test_register_rejects_empty_password() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": ""
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

/// Logout without an Authorization header answers 401
#[tokio::test]
async fn test_logout_requires_authorization_header() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout/")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "unauthorized");
}

/// Logout with a non-Bearer scheme answers 400
#[tokio::test]
async fn test_logout_rejects_non_bearer_scheme() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout/")
        .header("authorization", "Basic dXNlcjpwdw==")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Protected routes answer 401 without a bearer token
#[tokio::test]
async fn test_protected_routes_require_session() {
    let ctx = TestContext::new();

    for (method, uri) in [
        ("GET", "/auth/profile/"),
        ("GET", "/companies/user-companies/"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = ctx.call(request).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a session",
            method,
            uri
        );
    }
}

/// Location lookups and the coordinate scatter are served without a session
#[tokio::test]
async fn test_location_and_utility_routes_are_public() {
    let ctx = TestContext::new();

    for (method, uri) in [
        ("GET", "/locations/search_locations/?search_term=Lon"),
        ("GET", "/locations/coordinates/?location_id=00000000-0000-0000-0000-000000000001"),
        ("POST", "/companies/random-coordinates/"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = ctx.call(request).await;
        assert_ne!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should not require a session",
            method,
            uri
        );
    }
}

/// Anonymous city search without a term fails validation, not auth
#[tokio::test]
async fn test_search_locations_requires_search_term() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/locations/search_locations/")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

/// Anonymous coordinate lookup without an id fails validation, not auth
#[tokio::test]
async fn test_coordinates_requires_location_id() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/locations/coordinates/")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

/// OAuth login rejects an empty access token
#[tokio::test]
async fn test_oauth_login_rejects_empty_token() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/oauth/google/")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "access_token": "" }).to_string()))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

/// OAuth login against an unconfigured provider answers 400
#[tokio::test]
async fn test_oauth_login_unconfigured_provider() {
    let ctx = TestContext::new();

    // The harness configures Google only.
    let request = Request::builder()
        .method("POST")
        .uri("/oauth/facebook/")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "access_token": "tok" }).to_string()))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["message"], "facebook login is not configured");
}

/// OAuth urls expose configured providers and omit the rest
#[tokio::test]
async fn test_oauth_urls_reflect_configuration() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/oauth/urls/")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["google"]["client_id"], "test-google-client");
    assert_eq!(
        body["google"]["redirect_uri"],
        "http://localhost:3000/oauth/google/callback"
    );
    assert!(body.get("facebook").is_none());
}

/// Unknown paths answer 404
#[tokio::test]
async fn test_unknown_path_is_404() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
