//! # Integration Tests
//!
//! The full account flow over HTTP.

use super::*;

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = test_app().await;

    let alice = register_alice(&app).await;
    let token = login_alice(&app).await;

    let me = app
        .clone()
        .oneshot(get_request("/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me: AccountResponse = read_json(me).await;
    assert_eq!(me.username, "alice");
    assert_eq!(me.id, alice.id);

    let wrong = app
        .clone()
        .oneshot(json_request("POST", "/login", &login_request("alice", "wrong")))
        .await
        .unwrap();
    assert_error(wrong, StatusCode::UNAUTHORIZED, "InvalidCredentials").await;

    let duplicate = app
        .oneshot(json_request(
            "POST",
            "/users",
            &register_request("alice", "other@x.com", "x1234567"),
        ))
        .await
        .unwrap();
    assert_error(duplicate, StatusCode::CONFLICT, "UsernameTaken").await;
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = test_app().await;

    let first = app
        .clone()
        .oneshot(get_request("/health", None))
        .await
        .unwrap();
    let second = app.oneshot(get_request("/nope", None)).await.unwrap();

    let first_id = first.headers().get("x-request-id").unwrap();
    let second_id = second.headers().get("x-request-id").unwrap();
    assert_eq!(first_id.len(), 36);
    assert_ne!(first_id, second_id);
}
