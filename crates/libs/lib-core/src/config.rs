//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The loaded [`Config`] is passed explicitly to whatever needs it (the token
//! issuer, the password hasher, the database pool); there is no global instance.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//! let issuer = config.token_issuer();
//! # Ok::<(), lib_core::AppError>(())
//! ```

use crate::error::{AppError, Result};
use chrono::Duration;
use lib_auth::token::DEFAULT_ISSUER;
use lib_auth::{Argon2Hasher, HashCost, SigningKey, TokenIssuer};
use lib_utils::envs::{self, get_env, get_env_or, get_env_parse_or};

/// Minimum accepted length of `JWT_SECRET`.
pub const MIN_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for token signing and verification
    ///
    /// **Must be at least 32 characters long.**
    pub jwt_secret: SigningKey,

    /// Token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub jwt_expiration_hours: i64,

    /// Value of the `iss` claim
    pub jwt_issuer: String,

    /// Argon2 work factor
    pub hash_cost: HashCost,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `JWT_SECRET` is an error: the server must not start without
    /// a signing key.
    pub fn from_env() -> Result<Self> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/identity.db");

        let jwt_secret = get_env("JWT_SECRET")
            .map(SigningKey::new)
            .map_err(|_| AppError::Config("JWT_SECRET must be set in environment".to_string()))?;

        let jwt_expiration_hours = get_env_parse_or("JWT_EXPIRATION_HOURS", 24).map_err(env_err)?;
        let jwt_issuer = get_env_or("JWT_ISSUER", DEFAULT_ISSUER);

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: get_env_parse_or("HASH_MEMORY_KIB", defaults.memory_kib).map_err(env_err)?,
            iterations: get_env_parse_or("HASH_ITERATIONS", defaults.iterations).map_err(env_err)?,
            parallelism: get_env_parse_or("HASH_PARALLELISM", defaults.parallelism)
                .map_err(env_err)?,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            jwt_issuer,
            hash_cost,
        })
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        if self.jwt_expiration_hours < 1 || self.jwt_expiration_hours > 720 {
            return Err(AppError::Config(
                "JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string(),
            ));
        }

        if self.jwt_issuer.trim().is_empty() {
            return Err(AppError::Config("JWT_ISSUER cannot be empty".to_string()));
        }

        // Surfaces bad HASH_* combinations at startup rather than on first signup.
        self.password_hasher()?;

        Ok(())
    }

    /// Build the token issuer described by this configuration.
    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer::new(Some(self.jwt_secret.clone()))
            .with_lifetime(Duration::hours(self.jwt_expiration_hours))
            .with_issuer(self.jwt_issuer.clone())
    }

    /// Build the password hasher described by this configuration.
    pub fn password_hasher(&self) -> Result<Argon2Hasher> {
        Argon2Hasher::new(self.hash_cost).map_err(|e| AppError::Config(e.to_string()))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

fn env_err(err: envs::Error) -> AppError {
    match err {
        envs::Error::MissingEnv(name) => AppError::Config(format!("{} must be set", name)),
        envs::Error::WrongFormat(name) => {
            AppError::Config(format!("{} must be a valid number", name))
        }
    }
}
