//! # Identity Tokens
//!
//! Issuing and validating signed, time-bounded identity tokens (HS256 JWT).
//!
//! Tokens are stateless: everything needed to accept one (subject, validity
//! window, issuer) is inside the token and covered by the signature. The
//! server keeps only the symmetric key.
//!
//! ## Example
//!
//! ```rust
//! use lib_auth::token::{SigningKey, TokenIssuer, TokenSubject};
//!
//! struct User { id: i64, name: String }
//!
//! impl TokenSubject for User {
//!     fn subject_id(&self) -> i64 { self.id }
//!     fn subject_name(&self) -> &str { &self.name }
//! }
//!
//! let issuer = TokenIssuer::new(Some(SigningKey::new("0123456789abcdef0123456789abcdef")));
//! let user = User { id: 7, name: "alice".to_string() };
//!
//! let token = issuer.issue(&user).unwrap();
//! let claims = issuer.validate(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use lib_utils::now_utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only signing algorithm issued and accepted.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Default token lifetime in hours.
pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "identity-backend";

/// Anything a token can be issued for.
pub trait TokenSubject {
    /// Stable identifier, carried in `sub`.
    fn subject_id(&self) -> i64;
    /// Display name, carried in `username`.
    fn subject_name(&self) -> &str;
}

/// Claims carried by every identity token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Not valid before (Unix timestamp)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer label
    pub iss: String,
}

impl Claims {
    /// Parse the subject back into an account ID.
    pub fn subject_id(&self) -> Result<i64, Error> {
        self.sub
            .parse()
            .map_err(|_| Error::TokenMalformed(format!("subject is not an id: {}", self.sub)))
    }
}

/// Symmetric signing secret.
///
/// `Debug` never prints the secret.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Mints and validates identity tokens.
///
/// Built once at startup from configuration and shared read-only. An issuer
/// built without a key, or with an empty one, refuses every operation with
/// [`Error::KeyUnavailable`].
pub struct TokenIssuer {
    keys: Option<Keys>,
    lifetime: Duration,
    issuer: String,
}

impl TokenIssuer {
    /// Create an issuer with the default lifetime and issuer label.
    ///
    /// An empty key is treated as no key.
    pub fn new(key: Option<SigningKey>) -> Self {
        let keys = key.filter(|key| !key.is_empty()).map(|key| Keys {
            encoding: EncodingKey::from_secret(&key.0),
            decoding: DecodingKey::from_secret(&key.0),
        });

        Self {
            keys,
            lifetime: Duration::hours(DEFAULT_LIFETIME_HOURS),
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Set the token lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set the issuer label.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token valid from now for the configured lifetime.
    pub fn issue(&self, subject: &impl TokenSubject) -> Result<String, Error> {
        self.issue_at(subject, now_utc())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &impl TokenSubject, now: DateTime<Utc>) -> Result<String, Error> {
        let keys = self.keys.as_ref().ok_or(Error::KeyUnavailable)?;

        let issued_at = now.timestamp();
        let claims = Claims {
            sub: subject.subject_id().to_string(),
            username: subject.subject_name().to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
        };

        if claims.exp <= claims.iat {
            return Err(Error::SigningFailure(
                "token lifetime must be positive".to_string(),
            ));
        }

        encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| Error::SigningFailure(e.to_string()))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, Error> {
        self.validate_at(token, now_utc())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// Checks run in order: key present, algorithm is exactly [`ALGORITHM`],
    /// signature, required claims and issuer, then the `[nbf, exp)` window.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Error> {
        let keys = self.keys.as_ref().ok_or(Error::KeyUnavailable)?;

        // Time checks are done below against `now` with no leeway.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "nbf", "iss"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(Error::from_jwt)?
            .claims;

        if claims.exp <= claims.iat {
            return Err(Error::TokenMalformed(
                "expiry is not after issued-at".to_string(),
            ));
        }

        let now = now.timestamp();
        if now < claims.nbf {
            return Err(Error::TokenNotYetValid);
        }
        if now >= claims.exp {
            return Err(Error::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("has_key", &self.keys.is_some())
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .finish()
    }
}

// region:    --- Error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Signing key unavailable")]
    KeyUnavailable,

    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    #[error("Invalid token signature")]
    SignatureInvalid,
}

impl Error {
    fn from_jwt(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Error::SignatureInvalid,
            ErrorKind::ExpiredSignature => Error::TokenExpired,
            ErrorKind::ImmatureSignature => Error::TokenNotYetValid,
            _ => Error::TokenMalformed(err.to_string()),
        }
    }
}
// endregion: --- Error
