use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

pub async fn login(
    body: LoginRequest,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let username = body
        .username
        .ok_or(UsernameError::Missing)
        .and_then(|raw| Username::parse(&raw))
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let login_result = session_service
        .login(username)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = LoginResponse {
        access_token: login_result.access_token,
        refresh_token: login_result.refresh_token,
    };
    Ok(warp::reply::json(&response))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: AccessToken,
}

pub async fn refresh_token(
    body: TokenRequest,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    // A missing token is the service's call (401), not a shape error.
    let token = body.token.unwrap_or_default();
    let access_token = session_service
        .refresh(&token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&TokenResponse { access_token }))
}

pub async fn logout(
    body: TokenRequest,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let token = match body.token.as_deref().map(str::trim) {
        None => Err(ApiErrorCode::InvalidInput("\"token\" is required".to_string())),
        Some("") => Err(ApiErrorCode::InvalidInput(
            "\"token\" is not allowed to be empty".to_string(),
        )),
        Some(token) => Ok(token.to_string()),
    }
    .map_err(reject::custom)?;

    session_service
        .logout(&token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT))
}

pub async fn list_posts(
    principal: Username,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = post_service
        .posts_for(&principal)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&posts))
}
