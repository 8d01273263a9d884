//! # Identity Service
//!
//! The client-facing operations: register, login (authenticate then issue a
//! token), look an account up, and verify a presented token.

use crate::services::AccountManager;
use lib_auth::{Claims, TokenIssuer};
use lib_core::{Account, AppError, Config, CredentialStore, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: String,
}

pub struct IdentityService {
    accounts: AccountManager,
    tokens: TokenIssuer,
}

impl IdentityService {
    pub fn new(accounts: AccountManager, tokens: TokenIssuer) -> Self {
        Self { accounts, tokens }
    }

    /// Wire the service from configuration over the given store.
    pub fn from_config(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let hasher = Arc::new(config.password_hasher()?);
        Ok(Self::new(
            AccountManager::new(store, hasher),
            config.token_issuer(),
        ))
    }

    pub fn accounts(&self) -> &AccountManager {
        &self.accounts
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Account> {
        self.accounts.register(username, email, password).await
    }

    /// Authenticate and issue a token for the account.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let account = self.accounts.authenticate(username, password).await?;
        let token = self.tokens.issue(&account)?;

        info!("[LOGIN] Token issued (id: {})", account.id);
        Ok(LoginOutcome { account, token })
    }

    pub async fn get_account(&self, id: i64) -> Result<Account> {
        self.accounts.get_by_id(id).await
    }

    /// Validate a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.validate(token).map_err(|e| {
            warn!("[AUTH] Token rejected: {}", e);
            AppError::from(e)
        })
    }

    /// The account a validated token was issued for.
    pub async fn current_account(&self, claims: &Claims) -> Result<Account> {
        let id = claims.subject_id()?;
        self.accounts.get_by_id(id).await
    }
}
