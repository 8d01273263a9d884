//! # In-Memory Credential Store
//!
//! A [`CredentialStore`] kept in process memory. Uniqueness checks and the
//! insert happen under one write lock, which gives the same guarantee as the
//! SQL `UNIQUE` constraints for a single process.

use super::models::{AccountForCreate, AccountRecord};
use super::{CredentialStore, StoreError, UniqueField};
use async_trait::async_trait;
use lib_utils::now_utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    accounts: BTreeMap<i64, AccountRecord>,
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn insert(&self, account: AccountForCreate) -> Result<AccountRecord, StoreError> {
        if account.password_hash.is_empty() {
            return Err(StoreError::Persistence(
                "password hash cannot be empty".to_string(),
            ));
        }

        let mut inner = self.inner.write().await;

        if inner.accounts.values().any(|a| a.username == account.username) {
            return Err(StoreError::Conflict(Some(UniqueField::Username)));
        }
        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(Some(UniqueField::Email)));
        }

        inner.last_id += 1;
        let now = now_utc();
        let record = AccountRecord {
            id: inner.last_id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(record.id, record.clone());

        Ok(record)
    }
}
