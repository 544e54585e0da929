use super::StoreError;
use crate::domain_model::*;
use std::time::Duration;

/// Owns every refresh-token record. Each operation is atomic per record:
/// implementations must not split a check and its write across two calls.
#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new active record expiring `ttl` from now.
    /// Fails with `StoreError::Conflict` when `token` is already known.
    async fn issue(
        &self,
        token: &RefreshToken,
        owner: &Username,
        ttl: Duration,
    ) -> Result<RefreshTokenRecord, StoreError>;

    /// The owner of `token` if it exists, is not revoked and has not expired.
    /// Never mutates state.
    async fn validate(&self, token: &str) -> Result<Option<Username>, StoreError>;

    /// Mark `token` revoked. `false` when it is unknown or already revoked.
    async fn revoke(&self, token: &str) -> Result<bool, StoreError>;

    /// Delete revoked and expired records, returning how many were removed.
    async fn sweep(&self) -> Result<u64, StoreError>;

    /// Tokens currently stored for `owner`, oldest first.
    async fn tokens_of(&self, owner: &Username) -> Result<Vec<RefreshToken>, StoreError>;
}
