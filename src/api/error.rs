use crate::application_port::*;
use crate::domain_model::UsernameError;
use crate::domain_port::StoreError;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use std::error::Error as _;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Every rejection ends here, so clients only ever see `ApiError` bodies.
pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        let cause = e.source().map(|s| s.to_string()).unwrap_or_else(|| e.to_string());
        ApiErrorCode::InvalidInput(cause)
    } else if err.find::<reject::LengthRequired>().is_some() {
        ApiErrorCode::InvalidInput("request body is required".to_string())
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        ApiErrorCode::InvalidInput("request body is too large".to_string())
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        ApiErrorCode::InvalidInput("request body must be JSON".to_string())
    } else if let Some(e) = err.find::<reject::InvalidHeader>() {
        ApiErrorCode::InvalidInput(e.to_string())
    } else if err.find::<warp::cors::CorsForbidden>().is_some() {
        ApiErrorCode::OriginNotAllowed
    } else if err.is_not_found() || err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::EndpointNotFound
    } else {
        ApiErrorCode::internal(format!("unhandled rejection: {:?}", err))
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&code.body()),
        code.status(),
    ))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiErrorCode {
    #[error("Invalid input")]
    InvalidInput(String),
    #[error("Access token required")]
    AccessTokenRequired,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Refresh token required")]
    RefreshTokenRequired,
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("Token not found or already revoked")]
    TokenNotFound,
    #[error("Too many login attempts, please try again later.")]
    TooManyLoginAttempts,
    #[error("Too many requests from this IP, please try again later.")]
    TooManyRequests,
    #[error("Origin not allowed")]
    OriginNotAllowed,
    #[error("Endpoint not found")]
    EndpointNotFound,
    #[error("Internal server error")]
    InternalError,
}

impl ApiErrorCode {
    /// Log the cause server-side; the client only gets a generic 500.
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        error!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidInput(_) | ApiErrorCode::TokenNotFound => StatusCode::BAD_REQUEST,
            ApiErrorCode::AccessTokenRequired
            | ApiErrorCode::TokenExpired
            | ApiErrorCode::RefreshTokenRequired => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InvalidToken
            | ApiErrorCode::InvalidRefreshToken
            | ApiErrorCode::OriginNotAllowed => StatusCode::FORBIDDEN,
            ApiErrorCode::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::TooManyLoginAttempts | ApiErrorCode::TooManyRequests => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ApiError {
        let details = match self {
            ApiErrorCode::InvalidInput(details) => Some(details.clone()),
            _ => None,
        };
        ApiError {
            error: self.to_string(),
            details,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<UsernameError> for ApiErrorCode {
    fn from(error: UsernameError) -> Self {
        ApiErrorCode::InvalidInput(error.to_string())
    }
}

impl From<GateError> for ApiErrorCode {
    fn from(error: GateError) -> Self {
        match error {
            GateError::MissingToken => ApiErrorCode::AccessTokenRequired,
            GateError::Expired => ApiErrorCode::TokenExpired,
            GateError::Invalid => ApiErrorCode::InvalidToken,
        }
    }
}

impl From<SessionError> for ApiErrorCode {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::RefreshTokenRequired => ApiErrorCode::RefreshTokenRequired,
            SessionError::InvalidRefreshToken => ApiErrorCode::InvalidRefreshToken,
            SessionError::TokenNotFound => ApiErrorCode::TokenNotFound,
            SessionError::Token(e) => ApiErrorCode::internal(e),
            SessionError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<StoreError> for ApiErrorCode {
    fn from(error: StoreError) -> Self {
        ApiErrorCode::internal(error)
    }
}
