//! Database operations for Snipbin.
//!
//! ## Tables
//!
//! - `snippets` - user-submitted snippets with server-side expiry
//! - `users` - site authentication
//! - `tower_sessions.session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and applied via:
//! ```bash
//! sqlx migrate run --source crates/web/migrations
//! ```
//!
//! Queries use the runtime-checked sqlx API so the crate builds without
//! a live database.

pub mod snippets;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found (or has expired).
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a PostgreSQL connection pool with sensible defaults.
///
/// Connecting eagerly here makes an unreachable database fatal at
/// startup rather than at first request.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
