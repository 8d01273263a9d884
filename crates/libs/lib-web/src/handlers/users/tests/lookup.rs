//! # Lookup Tests
//!
//! Tests for `GET /users/{id}`, `GET /me` and `GET /health`.

use super::*;

#[tokio::test]
async fn test_get_user() {
    let app = test_app().await;
    let alice = register_alice(&app).await;

    let response = app
        .oneshot(get_request(&format!("/users/{}", alice.id), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let found: AccountResponse = read_json(response).await;
    assert_eq!(found, alice);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/users/999", None)).await.unwrap();

    assert_error(response, StatusCode::NOT_FOUND, "NotFound").await;
}

#[tokio::test]
async fn test_get_user_non_numeric_id() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/users/abc", None)).await.unwrap();

    let error = assert_error(response, StatusCode::BAD_REQUEST, "InvalidInput").await;
    assert_eq!(error.field.as_deref(), Some("id"));
}

#[tokio::test]
async fn test_me_with_token() {
    let app = test_app().await;
    let alice = register_alice(&app).await;
    let token = login_alice(&app).await;

    let response = app.oneshot(get_request("/me", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let me: AccountResponse = read_json(response).await;
    assert_eq!(me, alice);
}

#[tokio::test]
async fn test_me_without_token() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/me", None)).await.unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "MissingToken").await;
}

#[tokio::test]
async fn test_me_with_basic_scheme() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/me")
                .header("authorization", "Basic YWxpY2U6c2VjcmV0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "MissingToken").await;
}

#[tokio::test]
async fn test_me_with_tampered_token() {
    let app = test_app().await;
    register_alice(&app).await;
    let token = login_alice(&app).await;

    // Flip a character in the middle of the signature segment
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut sig: Vec<char> = signature.chars().collect();
    let mid = sig.len() / 2;
    sig[mid] = if sig[mid] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}.{}", head, sig.into_iter().collect::<String>());

    let response = app.oneshot(get_request("/me", Some(&tampered))).await.unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "SignatureInvalid").await;
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/me", Some("not-a-token")))
        .await
        .unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "TokenMalformed").await;
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = read_json(response).await;
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/nope", None)).await.unwrap();

    assert_error(response, StatusCode::NOT_FOUND, "NotFound").await;
}
