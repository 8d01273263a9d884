//! # Authentication Library
//!
//! Password hashing and signed identity tokens.

pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use pwd::{Argon2Hasher, HashCost, PasswordHasher};
pub use token::{Claims, SigningKey, TokenIssuer, TokenSubject};
