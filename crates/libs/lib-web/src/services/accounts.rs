//! # Account Service
//!
//! Registration, authentication and lookup of accounts.
//!
//! ## Registration and uniqueness
//!
//! Registration looks the username and email up before hashing, which gives
//! precise errors cheaply in the common case. That lookup is check-then-act:
//! two concurrent requests can both pass it. The store's insert is the only
//! authority on uniqueness, so a conflict at insert is reported as
//! `UsernameTaken` / `EmailTaken` exactly like a pre-check hit. Do not drop
//! the conflict handling on the assumption that the pre-check covers it.
//!
//! ## Hashing
//!
//! Argon2 is deliberately slow, so hashing and verification run on tokio's
//! blocking pool. No store call is in flight while a hash is computed.
//!
//! Login against an unknown username still runs one verification, against a
//! hash prepared at construction, so both failure paths cost the same.

use lib_auth::PasswordHasher;
use lib_core::model::store::{StoreError, UniqueField};
use lib_core::{Account, AccountForCreate, AppError, CredentialStore, Result};
use lib_utils::validation::{
    validate_alphanumeric, validate_email, validate_length, validate_min_length, validate_not_empty,
};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, instrument, warn};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Plaintext behind the hash verified on the unknown-username path.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// Orchestrates the credential store and password hasher.
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    /// Same cost as real hashes; `None` if the hasher failed at startup.
    dummy_hash: Option<String>,
}

impl AccountManager {
    /// Create a manager. Computes one hash up front for the
    /// unknown-username login path.
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        let dummy_hash = match hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!("[LOGIN] Could not prepare dummy hash: {}", e);
                None
            }
        };

        Self {
            store,
            hasher,
            dummy_hash,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - username, email or password fails validation
    /// - `UsernameTaken` / `EmailTaken` - uniqueness conflict, from the
    ///   pre-check or from the store's constraint
    /// - `HashingFailure` - the hasher failed
    /// - `Persistence` - the store failed
    #[instrument(skip(self, password), fields(username = %username, email = %email))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Account> {
        validate_registration(username, email, password)?;

        if self.store.find_by_username(username).await?.is_some() {
            warn!("[REGISTER] Username already taken");
            return Err(AppError::UsernameTaken);
        }

        if self.store.find_by_email(email).await?.is_some() {
            warn!("[REGISTER] Email already registered");
            return Err(AppError::EmailTaken);
        }

        debug!("[REGISTER] Hashing password...");
        let password_hash = self.hash_password(password).await?;

        debug!("[REGISTER] Inserting account...");
        let account = AccountForCreate::new(username.to_string(), email.to_string(), password_hash);
        let record = match self.store.insert(account).await {
            Ok(record) => record,
            Err(StoreError::Conflict(field)) => {
                warn!("[REGISTER] Lost uniqueness race at insert");
                return Err(self.resolve_conflict(field, username).await);
            }
            Err(err) => return Err(err.into()),
        };

        info!("[REGISTER] Account created (id: {})", record.id);
        Ok(record.into())
    }

    /// Authenticate a username/password pair.
    ///
    /// An unknown username and a wrong password produce the same
    /// `InvalidCredentials` error after the same amount of hashing work.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account> {
        let Some(record) = self.store.find_by_username(username).await? else {
            self.burn_verification(password).await;
            warn!("[LOGIN] Authentication failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(password, &record.password_hash).await? {
            warn!("[LOGIN] Authentication failed");
            return Err(AppError::InvalidCredentials);
        }

        debug!("[LOGIN] Credentials verified (id: {})", record.id);
        Ok(record.into())
    }

    /// Look an account up by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Account> {
        self.store
            .find_by_id(id)
            .await?
            .map(Account::from)
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Turn an insert conflict into the matching registration error.
    ///
    /// Without a field hint from the store, the username is probed again;
    /// email is the only other unique column.
    async fn resolve_conflict(&self, field: Option<UniqueField>, username: &str) -> AppError {
        match field {
            Some(UniqueField::Username) => AppError::UsernameTaken,
            Some(UniqueField::Email) => AppError::EmailTaken,
            None => match self.store.find_by_username(username).await {
                Ok(Some(_)) => AppError::UsernameTaken,
                Ok(None) => AppError::EmailTaken,
                Err(err) => err.into(),
            },
        }
    }

    /// Argon2 work matching a real verification, result discarded.
    async fn burn_verification(&self, password: &str) {
        let outcome = match &self.dummy_hash {
            Some(dummy_hash) => self.verify_password(password, dummy_hash).await.map(|_| ()),
            None => self.hash_password(password).await.map(|_| ()),
        };

        if let Err(e) = outcome {
            debug!("[LOGIN] Dummy verification failed: {}", e);
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        let hashed = task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::HashingFailure(e.to_string()))??;

        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AppError::HashingFailure(e.to_string()))
    }
}

/// Validate registration input. Runs before any lookup or hashing.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    let username_err = |reason| AppError::invalid_input("username", reason);

    validate_not_empty(username, "Username").map_err(username_err)?;
    validate_length(username, USERNAME_MIN_LEN, USERNAME_MAX_LEN, "Username")
        .map_err(username_err)?;
    validate_alphanumeric(username, "Username").map_err(username_err)?;

    validate_email(email).map_err(|reason| AppError::invalid_input("email", reason))?;

    validate_min_length(password, PASSWORD_MIN_LEN, "Password")
        .map_err(|reason| AppError::invalid_input("password", reason))?;

    Ok(())
}
