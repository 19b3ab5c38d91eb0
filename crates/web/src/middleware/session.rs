//! Session middleware configuration.
//!
//! PostgreSQL-backed sessions via tower-sessions: state is loaded
//! before each dynamic-route request, persisted after the inner chain
//! returns on any path, and the cookie is (re)issued whenever the
//! token changes (e.g. after renewal at login).

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::error::AppError;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "snipbin_session";

/// Session inactivity expiry in seconds (12 hours).
const SESSION_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// Create the session layer with a PostgreSQL store.
///
/// The cookie is HTTP-only, Secure, and scoped to path "/".
#[must_use]
pub fn create_session_layer(pool: &PgPool) -> SessionManagerLayer<PostgresStore> {
    // The session table is created by the migrations in `migrations/`.
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Store a one-time flash message in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), AppError> {
    session.insert(session_keys::FLASH, message).await?;
    Ok(())
}

/// Pop the flash message: read once, then absent.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.remove::<String>(session_keys::FLASH).await?)
}
