//! Authentication route handlers.
//!
//! Handles sign-in, the two-step registration wizard and logout against
//! the product backend's auth endpoints.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use momos_mart_core::Email;

use crate::backend::{BackendError, SignInResponse};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{
    PasswordChecks, PasswordStrength, PersonalInfo, RegistrationDraft, RegistrationStep,
    SecurityInput,
};
use crate::middleware::{Chrome, Page, clear_current_user, set_current_user};
use crate::models::{CurrentUser, Flash, session_keys};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration wizard button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisterAction {
    Next,
    Back,
    CheckStrength,
    Submit,
}

/// Registration form data. Only the fields of the current step are posted.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub action: RegisterAction,
    #[serde(flatten)]
    pub personal: PersonalInfo,
    #[serde(flatten)]
    pub security: SecurityInput,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: Chrome,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub chrome: Chrome,
    pub draft: RegistrationDraft,
    pub step_number: u8,
    pub on_security_step: bool,
    pub checks: PasswordChecks,
    /// Meter reading, shown once a password has been checked.
    pub strength: Option<PasswordStrength>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: Page) -> Result<Response> {
    Ok(LoginTemplate {
        chrome: page.chrome().await?,
    }
    .into_response())
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let password = SecretString::from(form.password);
    let Ok(email) = Email::parse(form.email.trim()) else {
        Flash::error("Invalid email or password").push(&session).await?;
        return Ok(Redirect::to("/login"));
    };

    match state.backend().sign_in(&email, &password).await {
        Ok(response) => {
            start_session(&session, email, response).await?;
            Ok(Redirect::to("/products"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Flash::error("Invalid email or password").push(&session).await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// Store the signed-in user and tag Sentry with them.
async fn start_session(session: &Session, email: Email, response: SignInResponse) -> Result<()> {
    let profile = response.user.unwrap_or_default();
    let name = profile
        .display_name()
        .unwrap_or_else(|| email.local_part().to_string());

    let user = CurrentUser::new(profile.id, name, email, response.token);
    set_current_user(session, &user).await?;

    match &user.id {
        Some(id) => set_sentry_user(id, Some(user.email.as_str())),
        None => set_sentry_user(&user.email, Some(user.email.as_str())),
    }
    tracing::info!(email = %user.email, "User signed in");
    Ok(())
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    session.flush().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

// =============================================================================
// Registration Routes
// =============================================================================

async fn load_draft(session: &Session) -> Result<RegistrationDraft> {
    Ok(session
        .get(session_keys::REGISTRATION_DRAFT)
        .await?
        .unwrap_or_default())
}

async fn save_draft(session: &Session, draft: &RegistrationDraft) -> Result<()> {
    session
        .insert(session_keys::REGISTRATION_DRAFT, draft)
        .await?;
    Ok(())
}

async fn render_register(
    page: &Page,
    draft: RegistrationDraft,
    password: Option<&str>,
) -> Result<Response> {
    let checks = password.map(PasswordChecks::evaluate).unwrap_or_default();
    Ok(RegisterTemplate {
        chrome: page.chrome().await?,
        step_number: draft.step.number(),
        on_security_step: draft.step == RegistrationStep::Security,
        draft,
        checks,
        strength: password.map(|_| checks.strength()),
    }
    .into_response())
}

/// Display the registration wizard at its current step.
pub async fn register_page(page: Page) -> Result<Response> {
    let draft = load_draft(page.session()).await?;
    render_register(&page, draft, None).await
}

/// Handle a registration wizard button.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    page: Page,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let session = page.session();
    let mut draft = load_draft(session).await?;

    match form.action {
        RegisterAction::Next => {
            if let Err(e) = draft.advance(form.personal) {
                Flash::error(e.to_string()).push(session).await?;
            }
            save_draft(session, &draft).await?;
        }
        RegisterAction::Back => {
            draft.subscribe_newsletter = form.security.subscribe_newsletter;
            draft.back();
            save_draft(session, &draft).await?;
        }
        RegisterAction::CheckStrength => {
            draft.subscribe_newsletter = form.security.subscribe_newsletter;
            save_draft(session, &draft).await?;
            return render_register(&page, draft, Some(&form.security.password)).await;
        }
        RegisterAction::Submit => {
            draft.subscribe_newsletter = form.security.subscribe_newsletter;
            save_draft(session, &draft).await?;
            return submit(&state, session, &draft, &form.security).await;
        }
    }

    Ok(Redirect::to("/register").into_response())
}

/// Run the guard, register, then sign in with the same credentials.
async fn submit(
    state: &AppState,
    session: &Session,
    draft: &RegistrationDraft,
    security: &SecurityInput,
) -> Result<Response> {
    let request = match draft.submit(security) {
        Ok(request) => request,
        Err(e) => {
            Flash::error(e.to_string()).push(session).await?;
            return Ok(Redirect::to("/register").into_response());
        }
    };

    if let Err(e) = state.backend().register(&request).await {
        tracing::warn!(error = %e, "Registration failed");
        let message = match e {
            BackendError::Rejected(message) => message,
            _ => "Registration failed".to_string(),
        };
        Flash::error(message).push(session).await?;
        return Ok(Redirect::to("/register").into_response());
    }

    tracing::info!(email = %request.email, "Account registered");
    session
        .remove::<RegistrationDraft>(session_keys::REGISTRATION_DRAFT)
        .await?;

    match state
        .backend()
        .sign_in(&request.email, &request.password)
        .await
    {
        Ok(response) => {
            start_session(session, request.email, response).await?;
            Flash::success("Registration successful! Signing you in...")
                .push(session)
                .await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in after registration failed");
            Flash::success("Registration successful! Please sign in.")
                .push(session)
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
    }
}
