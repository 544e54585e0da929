use crate::domain_model::*;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Correctly sealed, but past its expiry.
    #[error("token expired")]
    Expired,
    /// Bad seal, wrong key, or malformed structure.
    #[error("token invalid")]
    Invalid,
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Symmetric key material. Loaded once at startup and never printed.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        SigningKey(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// The two keys the service signs with. Access and refresh tokens never
/// share a key, so one class cannot be replayed as the other.
#[derive(Debug, Clone)]
pub struct TokenKeys {
    pub access: SigningKey,
    pub refresh: SigningKey,
}

#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stateless sealing and checking of time-boxed claims about a principal.
pub trait TokenSigner: Send + Sync {
    fn sign(
        &self,
        subject: &Username,
        key: &SigningKey,
        ttl: Duration,
    ) -> Result<SignedToken, TokenError>;

    /// Never returns `TokenError::Signing`.
    fn verify(&self, token: &str, key: &SigningKey) -> Result<AccessClaims, TokenError>;
}
