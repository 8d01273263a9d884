//! # Password Hashing
//!
//! One-way password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`), so the
//! salt and cost parameters travel with the digest and verification keeps
//! working after the configured cost changes.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;
use tracing::warn;

/// Hashing capability consumed by account registration and login.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, Error>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `false` for a mismatch and for a stored value that is not a
    /// valid hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl HashCost {
    /// Cheapest parameters argon2 accepts. Only meant for tests and tooling.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id implementation of [`PasswordHasher`] with an explicit work factor.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher for the given cost.
    ///
    /// Fails with [`Error::InvalidCost`] when argon2 rejects the parameters
    /// (for example less than `8 * parallelism` KiB of memory).
    pub fn new(cost: HashCost) -> Result<Self, Error> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| Error::InvalidCost(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::HashingFailure(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("[PWD] Stored password hash could not be parsed: {}", e);
                return false;
            }
        };

        // Digest comparison inside argon2 is constant-time.
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

// region:    --- Error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Failed to hash password: {0}")]
    HashingFailure(String),

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),
}
// endregion: --- Error
