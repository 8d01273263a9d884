//! # Account Handlers
//!
//! HTTP handlers for registration, login and account lookup.
//!
//! ## Example
//!
//! ```rust,ignore
//! use axum::{routing::{get, post}, Router};
//! use lib_web::handlers::users::{get_user, login, register};
//!
//! let app = Router::new()
//!     .route("/users", post(register))
//!     .route("/users/{id}", get(get_user))
//!     .route("/login", post(login))
//!     .with_state(identity);
//! ```

use crate::services::IdentityService;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, State},
    http::StatusCode,
};
use lib_auth::Claims;
use lib_core::dto::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use lib_core::{AppError, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

/// Register handler - creates a new account.
///
/// # Returns
///
/// * `201 Created` with the public account fields
/// * `400` `InvalidInput` (with `field`), `409` `UsernameTaken` / `EmailTaken`
#[instrument(skip_all)]
pub async fn register(
    State(identity): State<Arc<IdentityService>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let Json(req) = payload.map_err(body_error)?;
    info!("[REGISTER] New account request: {}", req.username);

    let account = identity
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Login handler - authenticates and returns a bearer token.
///
/// Unknown username and wrong password both answer `401 InvalidCredentials`.
#[instrument(skip_all)]
pub async fn login(
    State(identity): State<Arc<IdentityService>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload.map_err(body_error)?;
    info!("[LOGIN] Login attempt: {}", req.username);

    let outcome = identity.login(&req.username, &req.password).await?;

    Ok(Json(LoginResponse {
        user: outcome.account.into(),
        token: outcome.token,
    }))
}

/// Get an account by id.
///
/// The id is taken as a string so a non-numeric id answers with the
/// standard `InvalidInput` body rather than axum's path rejection.
pub async fn get_user(
    State(identity): State<Arc<IdentityService>>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::invalid_input("id", "invalid user ID"))?;

    let account = identity.get_account(id).await?;

    Ok(Json(account.into()))
}

/// The account behind the bearer token. Requires [`require_auth`](crate::middleware::require_auth).
pub async fn me(
    State(identity): State<Arc<IdentityService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AccountResponse>> {
    let account = identity.current_account(&claims).await?;

    Ok(Json(account.into()))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Request fields that can be reported by name when absent from the body.
const BODY_FIELDS: &[&str] = &["username", "email", "password"];

/// A missing request field is reported against that field; any other
/// body problem against `body`.
fn body_error(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    match missing_field(&message) {
        Some(field) => AppError::invalid_input(field, format!("{} is required", field)),
        None => AppError::invalid_input("body", message),
    }
}

/// Pull `x` out of serde's "missing field `x`".
fn missing_field(message: &str) -> Option<&'static str> {
    let rest = message.split("missing field `").nth(1)?;
    let name = rest.split('`').next()?;
    BODY_FIELDS.iter().copied().find(|field| *field == name)
}

#[cfg(test)]
mod tests;
