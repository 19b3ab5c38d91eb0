//! Authentication resolution and authorization gating.
//!
//! [`authenticate`] turns session state into an immutable per-request
//! [`AuthContext`]; [`require_authentication`] gates protected routes
//! on it.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use snipbin_core::UserId;

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Authentication fact derived once per request.
///
/// Set by [`authenticate`] before any handler runs and never mutated
/// afterwards; downstream stages only read it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthContext {
    user_id: Option<UserId>,
}

impl AuthContext {
    /// Context for a request with no verified identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Context for a request whose claimed identity was confirmed.
    #[must_use]
    pub const fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Whether the request carries a verified identity.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The verified user ID, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Resolve the session's claimed identity into an [`AuthContext`].
///
/// A claimed ID is only trusted after an existence check against user
/// storage, so authentication can never outlive account deletion. A
/// stale ID (deleted account) is dropped from the session and the
/// request proceeds anonymous; a storage failure fails the request.
///
/// # Errors
///
/// Returns a server error if the existence check or the session
/// mutation fails.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claimed: Option<UserId> = session.get(session_keys::AUTHENTICATED_USER_ID).await?;

    // A non-positive ID is "no claimed identity", not a lookup.
    let claimed = claimed.filter(|id| id.as_i32() > 0);

    let context = match claimed {
        None => AuthContext::anonymous(),
        Some(id) => {
            let exists = AuthService::new(state.pool()).user_exists(id).await?;
            let (context, clear_stale) = resolve(id, exists);
            if clear_stale {
                session
                    .remove::<UserId>(session_keys::AUTHENTICATED_USER_ID)
                    .await?;
            }
            context
        }
    };

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Decide the context for a claimed identity, and whether the stale
/// session key should be cleared.
const fn resolve(claimed: UserId, exists: bool) -> (AuthContext, bool) {
    if exists {
        (AuthContext::authenticated(claimed), false)
    } else {
        (AuthContext::anonymous(), true)
    }
}

/// Authorization gate for protected routes.
///
/// Anonymous requests are redirected to the login page and the wrapped
/// handler is never invoked. Authorized responses are marked
/// non-cacheable.
pub async fn require_authentication(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);

    if !authenticated {
        return Redirect::to("/user/login").into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_anonymous() {
        let context = AuthContext::default();
        assert!(!context.is_authenticated());
        assert_eq!(context.user_id(), None);
    }

    #[test]
    fn test_resolve_existing_user_authenticates() {
        let (context, clear_stale) = resolve(UserId::new(3), true);
        assert!(context.is_authenticated());
        assert_eq!(context.user_id(), Some(UserId::new(3)));
        assert!(!clear_stale);
    }

    #[test]
    fn test_resolve_deleted_user_downgrades_to_anonymous() {
        // A dangling ID is not an error: the request proceeds
        // anonymous and the stale key is cleared.
        let (context, clear_stale) = resolve(UserId::new(3), false);
        assert!(!context.is_authenticated());
        assert!(clear_stale);
    }
}
