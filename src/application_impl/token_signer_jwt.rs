use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    iat: i64,
    exp: i64,
    iss: String,
    jti: String, // keeps same-second tokens for one subject distinct
}

/// HS256 JWTs. Holds no key material: the caller picks the key per token class.
pub struct JwtHs256Signer {
    issuer: String,
}

impl JwtHs256Signer {
    pub fn new(issuer: impl Into<String>) -> Self {
        JwtHs256Signer {
            issuer: issuer.into(),
        }
    }

    fn sign_at(
        &self,
        subject: &Username,
        key: &SigningKey,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::Signing(e.to_string()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(SignedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    fn validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 0;
        v.validate_exp = true;
        v.set_issuer(&[self.issuer.as_str()]);
        v.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        v
    }
}

impl TokenSigner for JwtHs256Signer {
    fn sign(
        &self,
        subject: &Username,
        key: &SigningKey,
        ttl: Duration,
    ) -> Result<SignedToken, TokenError> {
        self.sign_at(subject, key, ttl, Utc::now())
    }

    fn verify(&self, token: &str, key: &SigningKey) -> Result<AccessClaims, TokenError> {
        // The seal is checked before the expiry, so a stale token under the
        // wrong key still reports Invalid.
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(key.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        let claims = data.claims;
        let subject = Username::parse(&claims.sub).map_err(|_| TokenError::Invalid)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;
        Ok(AccessClaims {
            subject,
            issued_at,
            expires_at,
        })
    }
}
