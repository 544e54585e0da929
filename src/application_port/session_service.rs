use super::TokenError;
use crate::domain_model::*;
use crate::domain_port::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("refresh token required")]
    RefreshTokenRequired,
    #[error("invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("token not found or already revoked")]
    TokenNotFound,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Mint an access/refresh pair for `username` and persist the refresh
    /// token before returning it. Every login yields an independent session.
    async fn login(&self, username: Username) -> Result<LoginResult, SessionError>;

    /// Mint a new access token from a stored refresh token. The refresh token
    /// itself is left untouched.
    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, SessionError>;

    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError>;

    /// Administrative lookup; not part of the request path.
    async fn tokens_of(&self, owner: &Username) -> Result<Vec<RefreshToken>, SessionError>;

    /// Run one sweep of the refresh-token store.
    async fn sweep(&self) -> Result<u64, SessionError>;
}
