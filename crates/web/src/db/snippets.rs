//! Snippet repository.

use sqlx::PgPool;

use snipbin_core::SnippetId;

use super::RepositoryError;
use crate::models::Snippet;

/// Repository for snippet database operations.
pub struct SnippetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SnippetRepository<'a> {
    /// Create a new snippet repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new snippet expiring `expires_days` from now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i32,
    ) -> Result<SnippetId, RepositoryError> {
        let id: SnippetId = sqlx::query_scalar(
            r"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, now(), now() + make_interval(days => $3))
            RETURNING id
            ",
        )
        .bind(title)
        .bind(content)
        .bind(expires_days)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Fetch a snippet by ID.
    ///
    /// Expired snippets are filtered out, so an expired snippet is
    /// indistinguishable from an absent one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no live snippet has
    /// this ID, `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SnippetId) -> Result<Snippet, RepositoryError> {
        sqlx::query_as::<_, Snippet>(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now() AND id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// The `n` most recently created, unexpired snippets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, n: i64) -> Result<Vec<Snippet>, RepositoryError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now()
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(n)
        .fetch_all(self.pool)
        .await?;

        Ok(snippets)
    }
}
