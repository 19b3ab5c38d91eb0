//! User domain type.

use chrono::{DateTime, Utc};

use snipbin_core::{Email, UserId};

/// A registered user.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across users.
    pub email: Email,
    /// When the account was created.
    pub created: DateTime<Utc>,
}
