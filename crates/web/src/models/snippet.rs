//! Snippet domain type.

use chrono::{DateTime, Utc};

use snipbin_core::SnippetId;

/// A user-submitted snippet with server-side expiry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Snippet {
    /// Unique snippet ID.
    pub id: SnippetId,
    /// Title, at most 100 characters.
    pub title: String,
    /// Snippet body.
    pub content: String,
    /// When the snippet was created.
    pub created: DateTime<Utc>,
    /// When the snippet stops being served.
    pub expires: DateTime<Utc>,
}
