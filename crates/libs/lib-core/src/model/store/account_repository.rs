//! # Account Repository
//!
//! SQLite implementation of [`CredentialStore`].
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{create_pool, migrate, AccountRepository, CredentialStore};
//! # use lib_core::AccountForCreate;
//! # async fn example() -> anyhow::Result<()> {
//! let pool = create_pool("sqlite::memory:").await?;
//! migrate(&pool).await?;
//! let repo = AccountRepository::new(pool);
//!
//! let account = repo
//!     .insert(AccountForCreate::new(
//!         "alice".to_string(),
//!         "alice@example.com".to_string(),
//!         "$argon2id$...".to_string(),
//!     ))
//!     .await?;
//!
//! let found = repo.find_by_email("alice@example.com").await?;
//! assert_eq!(found.map(|a| a.id), Some(account.id));
//! # Ok(())
//! # }
//! ```

use super::models::{AccountForCreate, AccountRecord};
use super::{CredentialStore, DbPool, StoreError};
use async_trait::async_trait;
use lib_utils::now_utc;
use sqlx::query_as;

const SELECT_ACCOUNT: &str =
    "SELECT id, username, email, password_hash, created_at, updated_at FROM accounts";

/// Account repository backed by the `accounts` table.
#[derive(Clone)]
pub struct AccountRepository {
    pool: DbPool,
}

impl AccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for AccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError> {
        let account = query_as::<_, AccountRecord>(&format!("{SELECT_ACCOUNT} WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        let account = query_as::<_, AccountRecord>(&format!("{SELECT_ACCOUNT} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError> {
        let account = query_as::<_, AccountRecord>(&format!("{SELECT_ACCOUNT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn insert(&self, account: AccountForCreate) -> Result<AccountRecord, StoreError> {
        let now = now_utc();

        // Single statement: the UNIQUE constraints decide, and the row comes
        // back with its assigned id.
        let record = query_as::<_, AccountRecord>(
            "INSERT INTO accounts (username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
