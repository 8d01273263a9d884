//! # HTTP Request Handlers
//!
//! Axum handlers for the identity API. Handlers parse the request, delegate
//! to [`IdentityService`](crate::services::IdentityService) and render the
//! result; they hold no business logic.
//!
//! ## Handler Modules
//!
//! - **[`users`]**: account endpoints
//!   - `POST /users` - Register a new account
//!   - `POST /login` - Authenticate and receive a token
//!   - `GET /users/{id}` - Look an account up
//!   - `GET /me` - The account behind the bearer token
//!   - `GET /health` - Liveness probe
//!
//! ## Handler Architecture
//!
//! ```rust,ignore
//! async fn handler(
//!     State(identity): State<Arc<IdentityService>>,  // Shared service
//!     Extension(claims): Extension<Claims>,          // Bearer auth
//!     payload: Result<Json<RequestBody>, JsonRejection>,
//! ) -> Result<Json<Response>, AppError> {
//!     // ...
//! }
//! ```
//!
//! ## Error Handling
//!
//! Handlers return `Result<T, AppError>`. `AppError` renders itself as
//! `{"error": ..., "code": ..., "field"?: ...}` with the matching status.
//!
//! ## Request/Response Flow
//!
//! ```text
//! Client Request
//!     ↓
//! CORS (tower-http)
//!     ↓
//! Request stamp → Trace span → Request logging
//!     ↓
//! Auth middleware (protected routes only)
//!     ↓
//! Handler
//!     ↓
//! Client Response
//! ```

pub mod users;
