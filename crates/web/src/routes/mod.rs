//! HTTP routes and page plumbing.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Home page (latest snippets)
//! GET  /snippet/view/{id}   - Single snippet
//! GET  /snippet/create      - Create form        (signed-in only)
//! POST /snippet/create      - Create action      (signed-in only)
//! GET  /user/signup         - Signup form
//! POST /user/signup         - Signup action
//! GET  /user/login          - Login form
//! POST /user/login          - Login action
//! POST /user/logout         - Logout action      (signed-in only)
//! GET  /static/*            - Static assets (no session)
//! ```
//!
//! Every application route runs the dynamic chain (session, then CSRF,
//! then authentication resolver); signed-in-only routes additionally
//! run the authorization gate, inside the dynamic chain.

pub mod auth;
pub mod home;
pub mod snippets;

use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{self, AuthContext, CsrfToken};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
const STATIC_DIR: &str = "crates/web/static";

/// Data shared by every rendered page: the popped flash message, the
/// authentication flag, and the CSRF token for forms.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

impl PageShell {
    /// Assemble the shell, popping the flash message from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(
        session: &Session,
        auth: AuthContext,
        csrf: &CsrfToken,
    ) -> Result<Self, AppError> {
        Ok(Self {
            flash: middleware::take_flash(session).await?,
            is_authenticated: auth.is_authenticated(),
            csrf_token: csrf.0.clone(),
        })
    }
}

/// Render a template with an explicit status, routing render failures
/// through the single server-error path.
pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> Result<Response, AppError> {
    let html = template.render()?;
    Ok((status, Html(html)).into_response())
}

/// Routes requiring a signed-in user.
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/snippet/create",
            get(snippets::create_form).post(snippets::create),
        )
        .route("/user/logout", post(auth::logout))
        .route_layer(from_fn(middleware::require_authentication))
}

/// All application routes, wrapped in the dynamic chain.
///
/// `route_layer` wraps previously-added routes, so the layers below
/// run session first, then CSRF, then the resolver on the way in
/// (last added is outermost).
fn dynamic_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/snippet/view/{id}", get(snippets::view))
        .route("/user/signup", get(auth::signup_form).post(auth::signup))
        .route("/user/login", get(auth::login_form).post(auth::login))
        .merge(protected_routes())
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .route_layer(from_fn(middleware::csrf_guard))
        .route_layer(middleware::create_session_layer(state.pool()))
}

/// Build the application router.
///
/// `/static` bypasses the dynamic chain entirely; unmatched paths hit
/// the configured fallback so the 404 taxonomy stays uniform.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(dynamic_routes(state.clone()))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .with_state(state)
}

/// Uniform 404 for unmatched paths.
async fn not_found() -> AppError {
    AppError::NotFound
}
