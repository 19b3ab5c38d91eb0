//! Access logging middleware.
//!
//! Logs every request before delegating, including ones that end in
//! 404/405/500. No branching, no state.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

/// Log remote address, protocol version, method, and URI, then
/// delegate.
pub async fn access_log(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_owned(), |ConnectInfo(addr)| addr.to_string());

    tracing::info!(
        remote = %remote,
        version = ?request.version(),
        method = %request.method(),
        uri = %request.uri(),
        "request"
    );

    next.run(request).await
}
