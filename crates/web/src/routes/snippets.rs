//! Snippet page handlers.

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use snipbin_core::SnippetId;

use crate::db::snippets::SnippetRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AuthContext, CsrfToken, set_flash};
use crate::models::Snippet;
use crate::routes::{PageShell, render};
use crate::state::AppState;
use crate::validation::{Validator, max_chars, not_blank, permitted};

/// Permitted snippet lifetimes in days.
const PERMITTED_EXPIRES: [i32; 3] = [1, 7, 365];

/// Snippet create form data.
#[derive(Debug, Deserialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i32,
    #[serde(skip)]
    pub errors: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            // Longest lifetime preselected on the blank form.
            expires: 365,
            errors: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    /// Run the field checks, recording failures on the form.
    fn validate(&mut self) {
        self.errors.check_field(
            not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        self.errors.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        self.errors.check_field(
            not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        self.errors.check_field(
            permitted(self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );
    }
}

/// Single snippet template.
#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub shell: PageShell,
    pub snippet: Snippet,
}

/// Create form template.
#[derive(Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub shell: PageShell,
    pub form: SnippetCreateForm,
}

/// Display a single snippet.
pub async fn view(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id).ok_or(AppError::NotFound)?;

    let snippet = SnippetRepository::new(state.pool()).get(id).await?;

    let shell = PageShell::load(&session, auth, &csrf).await?;
    render(StatusCode::OK, &ViewTemplate { shell, snippet })
}

/// Parse a raw path segment into a positive snippet ID.
///
/// Non-numeric and non-positive values are a 404 concern, never a
/// server fault.
#[must_use]
pub fn parse_id(raw: &str) -> Option<SnippetId> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(SnippetId::new)
}

/// Display the snippet create form.
pub async fn create_form(
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
) -> Result<Response, AppError> {
    let shell = PageShell::load(&session, auth, &csrf).await?;
    render(
        StatusCode::OK,
        &CreateTemplate {
            shell,
            form: SnippetCreateForm::default(),
        },
    )
}

/// Handle the snippet create submission.
///
/// Validation failures re-display the form with annotations; nothing
/// is written unless every check passes.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
    Form(mut form): Form<SnippetCreateForm>,
) -> Result<Response, AppError> {
    form.validate();
    if !form.errors.is_valid() {
        let shell = PageShell::load(&session, auth, &csrf).await?;
        return render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &CreateTemplate { shell, form },
        );
    }

    let id = SnippetRepository::new(state.pool())
        .insert(&form.title, &form.content, form.expires)
        .await?;

    set_flash(&session, "Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("7"), Some(SnippetId::new(7)));
        assert_eq!(parse_id("1"), Some(SnippetId::new(1)));
    }

    #[test]
    fn test_parse_id_rejects_non_numeric_and_non_positive() {
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("7.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_validate_rejects_overlong_title() {
        let mut form = SnippetCreateForm {
            title: "a".repeat(101),
            content: "ok".to_owned(),
            expires: 7,
            errors: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.errors.field_error("title"),
            Some("This field cannot be more than 100 characters long")
        );
        assert_eq!(form.errors.field_error("content"), None);
        assert_eq!(form.errors.field_error("expires"), None);
    }

    #[test]
    fn test_validate_rejects_unpermitted_expiry() {
        let mut form = SnippetCreateForm {
            title: "ok".to_owned(),
            content: "ok".to_owned(),
            expires: 9,
            errors: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.errors.field_error("expires"),
            Some("This field must equal 1, 7 or 365")
        );
    }

    #[test]
    fn test_validate_blank_title_reports_blank_not_length() {
        let mut form = SnippetCreateForm {
            title: String::new(),
            content: "ok".to_owned(),
            expires: 1,
            errors: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.errors.field_error("title"),
            Some("This field cannot be blank")
        );
    }

    #[test]
    fn test_validate_accepts_valid_form() {
        let mut form = SnippetCreateForm {
            title: "ok".to_owned(),
            content: "ok".to_owned(),
            expires: 7,
            errors: Validator::default(),
        };
        form.validate();
        assert!(form.errors.is_valid());
    }
}
