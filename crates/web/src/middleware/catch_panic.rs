//! Panic barrier.
//!
//! Outermost wrapper of the application chain: converts an unrecovered
//! panic anywhere downstream (router, inner middleware, handlers) into
//! a controlled 500 response instead of tearing down the connection
//! task. Explicit `AppError` propagation is the normal failure path;
//! this is the last resort.

use std::any::Any;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header::CONNECTION},
    response::Response,
};

/// Build the response for a caught panic.
///
/// The connection is marked non-reusable: the panic may have fired
/// mid-write, so nothing downstream should trust this connection's
/// state. Wire up with `CatchPanicLayer::custom(handle_panic)`.
#[must_use]
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "handler panicked");
    sentry::capture_message(
        &format!("handler panicked: {detail}"),
        sentry::Level::Error,
    );

    let mut response = Response::new(Body::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_response_shape() {
        let response = handle_panic(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONNECTION).unwrap(),
            HeaderValue::from_static("close")
        );
    }

    #[test]
    fn test_panic_with_string_payload() {
        let response = handle_panic(Box::new(String::from("owned payload")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_with_opaque_payload() {
        let response = handle_panic(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
