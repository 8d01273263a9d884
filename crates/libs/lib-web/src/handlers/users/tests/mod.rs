//! # Account Handler Tests
//!
//! Tests for the account endpoints, driven through the full router.

mod integration;
mod login;
mod lookup;

use crate::server::{create_router, AppState};
use crate::services::{AccountManager, IdentityService};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use lib_auth::{Argon2Hasher, HashCost, SigningKey, TokenIssuer};
use lib_core::dto::{AccountResponse, ErrorResponse, LoginRequest, LoginResponse, RegisterRequest};
use lib_core::model::store::{create_pool, migrate, AccountRepository};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";

/// Create test app over a fresh in-memory SQLite database
pub async fn test_app() -> Router {
    let pool = create_pool("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    migrate(&pool).await.expect("Failed to run migrations");

    let hasher = Arc::new(Argon2Hasher::new(HashCost::minimal()).expect("valid cost"));
    let accounts = AccountManager::new(Arc::new(AccountRepository::new(pool)), hasher);
    let tokens = TokenIssuer::new(Some(SigningKey::new(TEST_SECRET)));

    create_router(AppState::new(IdentityService::new(accounts, tokens)), &[])
}

pub fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

/// Register `alice` and return the created account
pub async fn register_alice(app: &Router) -> AccountResponse {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            &register_request("alice", "alice@x.com", "secret123"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

/// Log `alice` in and return the token
pub async fn login_alice(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/login", &login_request("alice", "secret123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse = read_json(response).await;
    login.token
}

pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) -> ErrorResponse {
    assert_eq!(response.status(), status);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.code, code);
    error
}
