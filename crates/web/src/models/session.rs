//! Session-related definitions.
//!
//! Session state is a string-keyed map persisted by the session layer;
//! these are the keys the pipeline and handlers use.

/// Session keys for per-session state.
pub mod keys {
    /// Key for the verified user ID of a signed-in session.
    pub const AUTHENTICATED_USER_ID: &str = "authenticated_user_id";

    /// Key for the per-session anti-forgery token.
    pub const CSRF_TOKEN: &str = "csrf_token";

    /// Key for the one-time flash message.
    pub const FLASH: &str = "flash";
}
