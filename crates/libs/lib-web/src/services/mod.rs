//! # Services Layer
//!
//! Business logic between the HTTP handlers and the credential store:
//!
//! ```text
//! Handlers (HTTP) → IdentityService → AccountManager → CredentialStore
//!                                   ↘ TokenIssuer     ↘ PasswordHasher
//! ```
//!
//! - [`accounts`] - registration, authentication and lookup of accounts
//! - [`identity`] - the operations exposed to clients: register, login
//!   (with token issuance), account lookup, token verification
//!
//! Every dependency (store, hasher, token issuer) is injected at construction,
//! so tests can build isolated instances over the in-memory store.
//!
//! All services return `Result<T, AppError>`.

pub mod accounts;
pub mod identity;

// Re-export services for convenience
pub use accounts::AccountManager;
pub use identity::{IdentityService, LoginOutcome};
