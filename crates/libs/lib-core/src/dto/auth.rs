//! # Account Data Transfer Objects
//!
//! Request and response structures for the account endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /users` - [`RegisterRequest`] -> [`AccountResponse`]
//! - `POST /login` - [`LoginRequest`] -> [`LoginResponse`]
//! - `GET /users/{id}`, `GET /me` - [`AccountResponse`]
//! - any failure - [`ErrorResponse`]
//!
//! ## Wire Format
//!
//! All DTOs use **snake_case** field names in JSON (default serde behavior).
//! Timestamps are RFC3339 strings in UTC.
//!
//! ```text
//! POST /login
//! Content-Type: application/json
//!
//! { "username": "alice", "password": "secret123" }
//! ```
//!
//! Response:
//! ```text
//! {
//!   "user": {
//!     "id": 1,
//!     "username": "alice",
//!     "email": "alice@x.com",
//!     "created_at": "2024-01-01T00:00:00Z"
//!   },
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```

use crate::model::Account;
use lib_utils::format_time;
use serde::{Deserialize, Serialize};

/// Registration request.
///
/// `Debug` redacts the password.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login request.
///
/// `Debug` redacts the password.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Public account information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            created_at: format_time(account.created_at),
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

/// Successful login: the account plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: AccountResponse,
    pub token: String,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_account_response_format() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let account = Account {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            created_at: created,
            updated_at: created,
        };

        let json = serde_json::to_value(AccountResponse::from(&account)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "username": "alice",
                "email": "alice@x.com",
                "created_at": "2024-01-01T00:00:00Z",
            })
        );
    }

    #[test]
    fn test_requests_redact_password() {
        let register = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret123".to_string(),
        };
        let login = LoginRequest {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        };

        assert!(!format!("{:?}", register).contains("secret123"));
        assert!(!format!("{:?}", login).contains("secret123"));
    }
}
