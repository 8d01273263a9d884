//! # Core Library
//!
//! Account model, credential storage, configuration, and the error type shared
//! by the identity backend.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, migrate, CredentialStore, DbPool};
pub use model::{Account, AccountForCreate, AccountRecord};
