mod error;
mod handler;
mod router;

pub use error::{ApiError, ApiErrorCode, recover_error};
pub use router::routes;

use crate::logger::*;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;
use warp::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// The complete HTTP surface: routes, error rendering, CORS, security
/// headers and the request log.
pub fn service(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    let cors = warp::cors()
        .allow_origins(server.allowed_origins.iter().map(String::as_str))
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "DELETE"])
        .allow_headers(vec!["content-type", "authorization"]);

    let request_limit = router::with_rate_limit(
        server.request_limiter.clone(),
        ApiErrorCode::TooManyRequests,
    );

    request_limit
        .and(routes(server))
        .recover(recover_error)
        .with(cors)
        .recover(recover_error)
        .with(warp::reply::with::headers(security_headers()))
        .with(warp::log::custom(log_request))
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::X_DNS_PREFETCH_CONTROL,
        HeaderValue::from_static("off"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=15552000; includeSubDomains"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers
}

fn log_request(info: warp::log::Info<'_>) {
    let status = info.status();
    let elapsed_ms = info.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(method = %info.method(), path = info.path(), status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        info!(method = %info.method(), path = info.path(), status = status.as_u16(), elapsed_ms, "request");
    }
}
