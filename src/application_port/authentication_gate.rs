use crate::domain_model::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// No `Authorization` header, a non-bearer scheme, or an empty token.
    #[error("access token required")]
    MissingToken,
    #[error("access token expired")]
    Expired,
    #[error("access token invalid")]
    Invalid,
}

/// Guards protected routes: turns the raw `Authorization` header value into
/// the principal the access token was issued to.
pub trait AuthenticationGate: Send + Sync {
    fn authenticate(&self, authorization: Option<&str>) -> Result<Username, GateError>;
}
