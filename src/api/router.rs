use super::error::*;
use super::handler;
use crate::application_port::*;
use crate::domain_model::Username;
use crate::server::*;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::http::header::AUTHORIZATION;
use warp::{Filter, reject};

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // Path before method: an unknown path must reject as not-found, not 405.
    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_rate_limit(
            server.login_limiter.clone(),
            ApiErrorCode::TooManyLoginAttempts,
        ))
        .and(json_body())
        .and(with(server.session_service.clone()))
        .and_then(handler::login);

    let token = warp::path("token")
        .and(warp::path::end())
        .and(warp::post())
        .and(token_body())
        .and(with(server.session_service.clone()))
        .and_then(handler::refresh_token);

    let logout = warp::path("logout")
        .and(warp::path::end())
        .and(warp::delete())
        .and(json_body())
        .and(with(server.session_service.clone()))
        .and_then(handler::logout);

    let posts = warp::path("posts")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_authentication(server.authentication_gate.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::list_posts);

    login.or(token).or(logout).or(posts)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// `/token` without any body is a missing refresh token, not a shape error.
fn token_body() -> impl Filter<Extract = (handler::TokenRequest,), Error = warp::Rejection> + Clone
{
    json_body::<handler::TokenRequest>().or_else(|rejection: warp::Rejection| async move {
        if rejection.find::<reject::LengthRequired>().is_some() {
            Ok((handler::TokenRequest { token: None },))
        } else {
            Err(rejection)
        }
    })
}

/// Resolves the principal behind the bearer token, or rejects. A missing or
/// undecodable header is not a routing miss: the gate sees it as no token.
fn with_authentication(
    authentication_gate: Arc<dyn AuthenticationGate>,
) -> impl Filter<Extract = (Username,), Error = warp::Rejection> + Clone {
    warp::header::headers_cloned().and_then(move |headers: HeaderMap| {
        let principal = authentication_gate
            .authenticate(
                headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok()),
            )
            .map_err(ApiErrorCode::from)
            .map_err(reject::custom);
        async move { principal }
    })
}

pub(super) fn with_rate_limit(
    limiter: Arc<RateLimiter>,
    exceeded: ApiErrorCode,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::addr::remote()
        .and_then(move |remote: Option<SocketAddr>| {
            let acquired = limiter.try_acquire(remote.map(|addr| addr.ip()));
            let exceeded = exceeded.clone();
            async move {
                if acquired {
                    Ok(())
                } else {
                    Err(reject::custom(exceeded))
                }
            }
        })
        .untuple_one()
}
