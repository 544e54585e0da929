use super::Username;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Bearer credentials stay out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(..)")
    }
}

/// What a verified access token asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub subject: Username,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A persisted refresh token. `expires_at` is fixed at issuance and `revoked`
/// only ever goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: RefreshToken,
    pub owner: Username,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshTokenRecord {
    pub fn new(token: RefreshToken, owner: Username, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        RefreshTokenRecord {
            token,
            owner,
            issued_at,
            expires_at,
            revoked: false,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Usable for a refresh at `now`.
    #[inline]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired_at(now)
    }

    /// Eligible for removal by the sweep at `now`.
    #[inline]
    pub fn is_sweepable_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked || self.is_expired_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ttl: Duration) -> (RefreshTokenRecord, DateTime<Utc>) {
        let now = Utc::now();
        let owner = Username::parse("Tamara").unwrap();
        (
            RefreshTokenRecord::new(RefreshToken("t".into()), owner, now, ttl),
            now,
        )
    }

    #[test]
    fn active_until_expiry_instant() {
        let (rec, now) = record(Duration::from_secs(60));
        assert!(rec.is_active_at(now));
        assert!(rec.is_active_at(now + chrono::Duration::seconds(59)));
        assert!(!rec.is_active_at(now + chrono::Duration::seconds(60)));
        assert!(rec.is_sweepable_at(now + chrono::Duration::seconds(60)));
    }

    #[test]
    fn revoked_is_never_active() {
        let (mut rec, now) = record(Duration::from_secs(60));
        rec.revoked = true;
        assert!(!rec.is_active_at(now));
        assert!(rec.is_sweepable_at(now));
    }

    #[test]
    fn debug_hides_token_text() {
        let token = RefreshToken("secret-value".into());
        assert!(!format!("{:?}", token).contains("secret-value"));
    }
}
