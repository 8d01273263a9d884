use chrono::{DateTime, Utc};
use lib_auth::TokenSubject;
use serde::Serialize;
use sqlx::FromRow;

/// Account row as stored, including the password hash.
///
/// Only the store and the account manager see this type; everything handed
/// to outside callers is an [`Account`]. `Debug` redacts the hash.
#[derive(Clone, FromRow, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Public view of an account. Has no password hash by construction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl TokenSubject for Account {
    fn subject_id(&self) -> i64 {
        self.id
    }

    fn subject_name(&self) -> &str {
        &self.username
    }
}

/// Data structure for creating a new account.
///
/// Password must already be hashed. The store assigns id and timestamps.
#[derive(Clone)]
pub struct AccountForCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl AccountForCreate {
    /// Create a new `AccountForCreate` instance.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
        }
    }
}

impl std::fmt::Debug for AccountForCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountForCreate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_utils::now_utc;

    fn record() -> AccountRecord {
        let now = now_utc();
        AccountRecord {
            id: 7,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$ZGlnZXN0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_account_drops_hash() {
        let account = Account::from(record());
        let json = serde_json::to_string(&account).unwrap();

        assert_eq!(account.id, 7);
        assert_eq!(account.username, "alice");
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        assert!(!format!("{:?}", record()).contains("argon2"));

        let create = AccountForCreate::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "$argon2id$secret".to_string(),
        );
        assert!(!format!("{:?}", create).contains("argon2"));
    }
}
