//! Signup, login, and logout handlers.

use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use snipbin_core::{Email, UserId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::{AuthContext, CsrfToken, set_flash};
use crate::models::session_keys;
use crate::routes::{PageShell, render};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;
use crate::validation::{Validator, min_chars, not_blank, valid_email};

/// Minimum password length for new accounts.
const MIN_PASSWORD_CHARS: usize = 8;

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub errors: Validator,
}

impl SignupForm {
    fn validate(&mut self) {
        self.errors
            .check_field(not_blank(&self.name), "name", "This field cannot be blank");
        self.errors.check_field(
            not_blank(&self.email),
            "email",
            "This field cannot be blank",
        );
        self.errors.check_field(
            valid_email(&self.email),
            "email",
            "This field must be a valid email address",
        );
        self.errors.check_field(
            not_blank(&self.password),
            "password",
            "This field cannot be blank",
        );
        self.errors.check_field(
            min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
    }
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub errors: Validator,
}

impl LoginForm {
    fn validate(&mut self) {
        self.errors.check_field(
            not_blank(&self.email),
            "email",
            "This field cannot be blank",
        );
        self.errors.check_field(
            valid_email(&self.email),
            "email",
            "This field must be a valid email address",
        );
        self.errors.check_field(
            not_blank(&self.password),
            "password",
            "This field cannot be blank",
        );
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub shell: PageShell,
    pub form: SignupForm,
}

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub shell: PageShell,
    pub form: LoginForm,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup form.
pub async fn signup_form(
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
) -> Result<Response, AppError> {
    let shell = PageShell::load(&session, auth, &csrf).await?;
    render(
        StatusCode::OK,
        &SignupTemplate {
            shell,
            form: SignupForm::default(),
        },
    )
}

/// Handle the signup submission.
///
/// A duplicate email is a field annotation, not a fault; everything
/// else from the service escalates.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
    Form(mut form): Form<SignupForm>,
) -> Result<Response, AppError> {
    form.validate();
    if !form.errors.is_valid() {
        let shell = PageShell::load(&session, auth, &csrf).await?;
        return render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &SignupTemplate { shell, form },
        );
    }

    // validate() guarantees the email parses.
    let email =
        Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    match AuthService::new(state.pool())
        .register(&form.name, &email, &form.password)
        .await
    {
        Ok(_) => {
            set_flash(&session, "Your signup was successful. Please log in.").await?;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(AuthError::DuplicateEmail) => {
            form.errors
                .add_field_error("email", "Email address is already in use");
            let shell = PageShell::load(&session, auth, &csrf).await?;
            render(
                StatusCode::UNPROCESSABLE_ENTITY,
                &SignupTemplate { shell, form },
            )
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login form.
pub async fn login_form(
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
) -> Result<Response, AppError> {
    let shell = PageShell::load(&session, auth, &csrf).await?;
    render(
        StatusCode::OK,
        &LoginTemplate {
            shell,
            form: LoginForm::default(),
        },
    )
}

/// Handle the login submission.
///
/// Bad credentials are recovered at the form as a non-field error;
/// only storage faults escalate.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Extension(auth): Extension<AuthContext>,
    Extension(csrf): Extension<CsrfToken>,
    Form(mut form): Form<LoginForm>,
) -> Result<Response, AppError> {
    form.validate();
    if !form.errors.is_valid() {
        let shell = PageShell::load(&session, auth, &csrf).await?;
        return render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &LoginTemplate { shell, form },
        );
    }

    let email =
        Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    match AuthService::new(state.pool())
        .login(&email, &form.password)
        .await
    {
        Ok(user_id) => {
            // Renew the session token on privilege change (fixation
            // defense), then record the verified identity.
            session.cycle_id().await?;
            session
                .insert(session_keys::AUTHENTICATED_USER_ID, user_id)
                .await?;

            Ok(Redirect::to("/snippet/create").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            form.errors
                .add_non_field_error("Email or password is incorrect");
            let shell = PageShell::load(&session, auth, &csrf).await?;
            render(
                StatusCode::UNPROCESSABLE_ENTITY,
                &LoginTemplate { shell, form },
            )
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout: renew the session token, drop the identity, leave a
/// flash for the next page.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    session.cycle_id().await?;
    session
        .remove::<UserId>(session_keys::AUTHENTICATED_USER_ID)
        .await?;
    set_flash(&session, "You've been logged out successfully!").await?;

    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation_catches_each_field() {
        let mut form = SignupForm {
            name: String::new(),
            email: "not-an-email".to_owned(),
            password: "short".to_owned(),
            errors: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.errors.field_error("name"),
            Some("This field cannot be blank")
        );
        assert_eq!(
            form.errors.field_error("email"),
            Some("This field must be a valid email address")
        );
        assert_eq!(
            form.errors.field_error("password"),
            Some("This field must be at least 8 characters long")
        );
    }

    #[test]
    fn test_signup_blank_email_reports_blank_first() {
        let mut form = SignupForm {
            name: "Ada".to_owned(),
            email: String::new(),
            password: "long enough".to_owned(),
            errors: Validator::default(),
        };
        form.validate();
        // Blank wins over the shape check on the same field.
        assert_eq!(
            form.errors.field_error("email"),
            Some("This field cannot be blank")
        );
    }

    #[test]
    fn test_signup_validation_accepts_valid_form() {
        let mut form = SignupForm {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse".to_owned(),
            errors: Validator::default(),
        };
        form.validate();
        assert!(form.errors.is_valid());
    }

    #[test]
    fn test_login_validation() {
        let mut form = LoginForm {
            email: "ada@example.com".to_owned(),
            password: String::new(),
            errors: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.errors.field_error("password"),
            Some("This field cannot be blank")
        );
        assert_eq!(form.errors.field_error("email"), None);
    }
}
