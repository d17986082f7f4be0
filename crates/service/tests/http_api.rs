//! End-to-end tests through the HTTP router.

mod common;

use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_router() -> Router {
    let state = common::setup_test_env().await;
    service::http::router(state)
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart_upload(token: &str, filename: &str, content: &[u8], password: Option<&str>) -> Request<Body> {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body: Vec<u8> = Vec::new();
    if let Some(password) = password {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"password\"\r\n\r\n{password}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/resources")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

/// Register an account and log in, returning the session token.
async fn register_and_login(router: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = send(
        router,
        json_request(
            "POST",
            "/accounts",
            None,
            json!({ "display_name": name, "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/sessions",
            None,
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session: Value = serde_json::from_slice(&body).unwrap();
    session["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_and_bad_credentials() {
    let router = test_router().await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/accounts",
            None,
            json!({ "display_name": "Alice", "email": "alice@example.com", "password": "pw-a" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // duplicate email
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/accounts",
            None,
            json!({ "display_name": "Alice2", "email": "alice@example.com", "password": "pw-x" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // missing fields
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/accounts",
            None,
            json!({ "display_name": "", "email": "x@example.com", "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // wrong password and unknown email answer the same way
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/sessions",
            None,
            json!({ "email": "alice@example.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/sessions",
            None,
            json!({ "email": "nobody@example.com", "password": "pw-a" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // good credentials
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/sessions",
            None,
            json!({ "email": "alice@example.com", "password": "pw-a" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(session["display_name"], "Alice");
    assert_eq!(session["email"], "alice@example.com");
    assert!(session["token"].as_str().is_some());
}

#[tokio::test]
async fn test_protected_image_lifecycle() {
    let router = test_router().await;
    let alice = register_and_login(&router, "Alice", "alice@example.com", "pw-a").await;
    let bob = register_and_login(&router, "Bob", "bob@example.com", "pw-b").await;

    // upload requires a token
    let (status, _) = send(
        &router,
        Request::builder()
            .method("POST")
            .uri("/resources")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Alice uploads a protected image
    let (status, body) = send(
        &router,
        multipart_upload(&alice, "cat.png", b"png bytes here", Some("secret123")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let upload: Value = serde_json::from_slice(&body).unwrap();
    let id = upload["resource_id"].as_str().unwrap().to_string();

    // protection status is visible without auth
    let (status, body) = send(
        &router,
        get_request(&format!("/resources/{id}/protection-status"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let protection: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(protection["requires_password"], true);

    // anonymous view: no password, wrong password, right password
    let (status, _) = send(
        &router,
        json_request("POST", &format!("/resources/{id}/content"), None, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/resources/{id}/content"),
            None,
            json!({ "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/resources/{id}/content"),
            None,
            json!({ "password": "secret123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"png bytes here");

    // authenticated fetch: owner passes, non-owner is forbidden
    let (status, body) = send(
        &router,
        get_request(&format!("/resources/{id}/content"), Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"png bytes here");

    let (status, _) = send(
        &router,
        get_request(&format!("/resources/{id}/content"), Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // public fetch denies protected images unconditionally
    let (status, _) = send(
        &router,
        get_request(&format!("/resources/{id}/public-content"), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // owner-side unlock check
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/resources/{id}/verify-password"),
            Some(&alice),
            json!({ "password": "secret123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let verdict: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(verdict["valid"], true);

    // non-owner cannot even ask
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/resources/{id}/verify-password"),
            Some(&bob),
            json!({ "password": "secret123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_clearing_password_makes_image_public() {
    let router = test_router().await;
    let alice = register_and_login(&router, "Alice", "alice@example.com", "pw-a").await;
    let bob = register_and_login(&router, "Bob", "bob@example.com", "pw-b").await;

    let (status, body) = send(
        &router,
        multipart_upload(&alice, "dog.jpg", b"jpg bytes", Some("woof")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let upload: Value = serde_json::from_slice(&body).unwrap();
    let id = upload["resource_id"].as_str().unwrap().to_string();

    // Bob cannot change the password
    let (status, _) = send(
        &router,
        json_request(
            "PUT",
            &format!("/resources/{id}/password"),
            Some(&bob),
            json!({ "password": "hijacked" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Alice clears it
    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            &format!("/resources/{id}/password"),
            Some(&alice),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let update: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(update["protected"], false);

    // now anyone can fetch it on the public path
    let (status, body) = send(
        &router,
        get_request(&format!("/resources/{id}/public-content"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"jpg bytes");

    // and the old password is irrelevant on the anonymous view path
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/resources/{id}/content"),
            None,
            json!({ "password": "stale" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_listing_and_deletion() {
    let router = test_router().await;
    let alice = register_and_login(&router, "Alice", "alice@example.com", "pw-a").await;
    let bob = register_and_login(&router, "Bob", "bob@example.com", "pw-b").await;

    let (_, body) = send(&router, multipart_upload(&alice, "a.png", b"aaa", None)).await;
    let first: Value = serde_json::from_slice(&body).unwrap();
    let first_id = first["resource_id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &router,
        multipart_upload(&alice, "b.png", b"bbb", Some("pw")),
    )
    .await;
    let second: Value = serde_json::from_slice(&body).unwrap();
    let second_id = second["resource_id"].as_str().unwrap().to_string();

    // newest first, scoped to the caller
    let (status, body) = send(&router, get_request("/resources", Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Value = serde_json::from_slice(&body).unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["resource_id"], second_id.as_str());
    assert_eq!(listed[0]["requires_password"], true);
    assert_eq!(listed[1]["resource_id"], first_id.as_str());

    let (status, body) = send(&router, get_request("/resources", Some(&bob))).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);

    // Bob cannot delete Alice's image
    let (status, _) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/resources/{first_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", bob))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // it is still there for Alice
    let (status, body) = send(
        &router,
        get_request(&format!("/resources/{first_id}/content"), Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"aaa");

    // Alice deletes it; subsequent fetches are a uniform 404
    let (status, _) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/resources/{first_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", alice))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        get_request(&format!("/resources/{first_id}/content"), Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &router,
        get_request(&format!("/resources/{first_id}/protection-status"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_and_garbage_tokens_are_rejected() {
    let router = test_router().await;
    register_and_login(&router, "Alice", "alice@example.com", "pw-a").await;

    let (status, _) = send(&router, get_request("/resources", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // a token signed with a different secret
    let forged = ::common::crypto::TokenSigner::new(b"other-secret").issue(uuid::Uuid::new_v4());
    let (status, _) = send(&router, get_request("/resources", Some(&forged))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_routes() {
    let router = test_router().await;

    let (status, _) = send(&router, get_request("/_status/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, get_request("/_status/version", None)).await;
    assert_eq!(status, StatusCode::OK);
    let version: Value = serde_json::from_slice(&body).unwrap();
    assert!(version["version"].as_str().is_some());

    let (status, _) = send(&router, get_request("/definitely-not-a-route", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
