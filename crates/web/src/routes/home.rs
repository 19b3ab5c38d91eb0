//! Home page handler.

use askama::Template;
use axum::{Extension, extract::State, http::StatusCode, response::Response};
use tower_sessions::Session;

use crate::db::snippets::SnippetRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AuthContext, CsrfToken};
use crate::models::Snippet;
use crate::routes::{PageShell, render};
use crate::state::AppState;

/// Number of snippets shown on the home page.
const LATEST_COUNT: i64 = 10;

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: PageShell,
    pub snippets: Vec<Snippet>,
}

/// Display the latest snippets.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
) -> Result<Response, AppError> {
    let snippets = SnippetRepository::new(state.pool())
        .latest(LATEST_COUNT)
        .await?;

    let shell = PageShell::load(&session, auth, &csrf).await?;
    render(StatusCode::OK, &HomeTemplate { shell, snippets })
}
