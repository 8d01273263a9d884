//! # Authentication Middleware
//!
//! Validates the bearer token in the `Authorization` header and injects the
//! token's [`Claims`] into the request extensions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use lib_web::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/me", get(handlers::users::me))
//!     .route_layer(from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Handlers then extract the claims with `Extension<Claims>`:
//!
//! ```rust,ignore
//! async fn me(Extension(claims): Extension<Claims>) -> String {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```

use crate::services::IdentityService;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::Claims;
use lib_core::AppError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authentication middleware.
///
/// # Behavior
///
/// - **Valid token**: continues with `Claims` in the request extensions
/// - **Missing header or non-`Bearer` scheme**: `401 MissingToken`
/// - **Rejected token**: `401` with the token error kind
///   (`TokenExpired`, `TokenMalformed`, `SignatureInvalid`, ...)
pub async fn require_auth(
    State(identity): State<Arc<IdentityService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or_else(|| {
        warn!("[AUTH] Missing or malformed Authorization header");
        AppError::MissingToken
    })?;

    let claims: Claims = identity.verify_token(token)?;

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.username, claims.sub);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
