//! CSRF guard.
//!
//! Issues a per-session anti-forgery token on safe requests and
//! validates it on state-changing ones. The token is bound to the
//! session, not the request: it survives from a GET to the POST it
//! renders, and is invalidated with the session.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore as _;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Form field carrying the token on state-changing requests.
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Header alternative to the form field.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Token entropy in bytes before encoding.
const TOKEN_BYTES: usize = 32;

/// Largest form body the guard will buffer while looking for the token.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// The session's anti-forgery token, exposed to handlers for embedding
/// in rendered forms.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

/// Validate state-changing requests against the session token and make
/// the token available to handlers.
///
/// Safe methods get a token attached (generating and storing one on
/// first use). Unsafe methods must present the exact session token in
/// the `csrf_token` form field or the `X-CSRF-Token` header; missing or
/// mismatched tokens fail closed before the inner handler runs.
///
/// # Errors
///
/// `AppError::CsrfRejected` (403) on missing/mismatched token,
/// `AppError::BadRequest` on an oversized form body.
pub async fn csrf_guard(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match session.get::<String>(session_keys::CSRF_TOKEN).await? {
        Some(token) => token,
        None => {
            let token = generate_token();
            session.insert(session_keys::CSRF_TOKEN, &token).await?;
            token
        }
    };

    if requires_validation(request.method()) {
        let (submitted, restored) = submitted_token(request).await?;
        request = restored;
        if submitted.as_deref() != Some(token.as_str()) {
            return Err(AppError::CsrfRejected);
        }
    }

    request.extensions_mut().insert(CsrfToken(token));
    Ok(next.run(request).await)
}

/// Safe methods pass through; everything else must present the token.
fn requires_validation(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Extract the submitted token from the header or the urlencoded body,
/// handing back a request whose body is replayed unchanged.
async fn submitted_token(request: Request) -> Result<(Option<String>, Request), AppError> {
    if let Some(value) = request.headers().get(CSRF_HEADER) {
        let token = value.to_str().ok().map(ToOwned::to_owned);
        return Ok((token, request));
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|_| AppError::BadRequest("form body too large".to_owned()))?;

    let token = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned());

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok((token, request))
}

/// A fresh URL-safe token with `TOKEN_BYTES` bytes of entropy.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
