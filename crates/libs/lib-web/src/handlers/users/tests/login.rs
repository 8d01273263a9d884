//! # Login Tests
//!
//! Tests for `POST /login`.

use super::*;

#[tokio::test]
async fn test_login_success() {
    // Arrange
    let app = test_app().await;
    let alice = register_alice(&app).await;

    // Act
    let response = app
        .oneshot(json_request("POST", "/login", &login_request("alice", "secret123")))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse = read_json(response).await;
    assert_eq!(login.user, alice);
    assert_eq!(login.token.split('.').count(), 3);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app().await;
    register_alice(&app).await;

    let response = app
        .oneshot(json_request("POST", "/login", &login_request("alice", "wrong")))
        .await
        .unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "InvalidCredentials").await;
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = test_app().await;
    register_alice(&app).await;

    let wrong_password = app
        .clone()
        .oneshot(json_request("POST", "/login", &login_request("alice", "wrong")))
        .await
        .unwrap();
    let unknown_user = app
        .oneshot(json_request("POST", "/login", &login_request("nobody", "secret123")))
        .await
        .unwrap();

    let a = assert_error(wrong_password, StatusCode::UNAUTHORIZED, "InvalidCredentials").await;
    let b = assert_error(unknown_user, StatusCode::UNAUTHORIZED, "InvalidCredentials").await;
    assert_eq!(a, b);
}
