//! # Credential Store
//!
//! The [`CredentialStore`] capability and its implementations:
//!
//! - [`AccountRepository`] - SQLite via sqlx, used by the server
//! - [`MemoryCredentialStore`] - in-process, for tests and tooling
//!
//! Uniqueness of username and email is the store's job and must be atomic
//! with the insert (a `UNIQUE` constraint, or a check under the same write
//! lock). Callers may look names up first for a friendlier error, but only
//! the insert decides.

// region: --- Modules
pub mod account_repository;
pub mod memory;
pub mod models;
// endregion: --- Modules

// region: --- Re-exports
pub use account_repository::AccountRepository;
pub use memory::MemoryCredentialStore;
// endregion: --- Re-exports

// region: --- Types and Functions
use async_trait::async_trait;
use models::{AccountForCreate, AccountRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Persistence capability consumed by the account manager.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError>;

    /// Insert a new account, assigning its id and timestamps.
    ///
    /// Fails with [`StoreError::Conflict`] if the username or email is
    /// already taken, however recently.
    async fn insert(&self, account: AccountForCreate) -> Result<AccountRecord, StoreError>;
}

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. The field is `None` when
    /// the backend did not say which one.
    #[error("Duplicate account ({0:?})")]
    Conflict(Option<UniqueField>),

    #[error("Storage failure: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // SQLite: "UNIQUE constraint failed: accounts.username"
                let message = db_err.message();
                let field = if message.contains("accounts.username") {
                    Some(UniqueField::Username)
                } else if message.contains("accounts.email") {
                    Some(UniqueField::Email)
                } else {
                    None
                };
                StoreError::Conflict(field)
            }
            _ => StoreError::Persistence(err.to_string()),
        }
    }
}

/// Create a new SQLite connection pool, creating the database file if missing.
///
/// In-memory databases are per connection, so they get a single-connection pool.
pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        pool_options = pool_options.max_connections(1);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Run the embedded schema migrations.
pub async fn migrate(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
// endregion: --- Types and Functions
