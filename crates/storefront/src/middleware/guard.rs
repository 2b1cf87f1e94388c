//! Route guard.
//!
//! Redirect decisions depend only on the path and whether a user is signed
//! in, so the decision itself is a pure function and the middleware just
//! reads the session and applies it.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::auth::load_current_user;

/// Sections that need a signed-in user.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/profile", "/admin"];

/// Sections only for signed-out visitors.
pub const GUEST_ONLY_PREFIXES: &[&str] = &["/login", "/register"];

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide what to do with a request for `path`.
///
/// Prefixes match as plain string prefixes, so `/profiles` is guarded
/// like `/profile`.
#[must_use]
pub fn evaluate(path: &str, authenticated: bool) -> GuardDecision {
    let matches = |prefixes: &[&str]| prefixes.iter().any(|prefix| path.starts_with(prefix));

    if !authenticated && matches(PROTECTED_PREFIXES) {
        return GuardDecision::Redirect("/login");
    }
    if authenticated && matches(GUEST_ONLY_PREFIXES) {
        return GuardDecision::Redirect("/dashboard");
    }
    GuardDecision::Allow
}

/// Middleware applying [`evaluate`] to every request.
pub async fn route_guard_middleware(session: Session, request: Request, next: Next) -> Response {
    let authenticated = load_current_user(&session).await.is_some();

    match evaluate(request.uri().path(), authenticated) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = request.uri().path(), to, "Route guard redirect");
            Redirect::to(to).into_response()
        }
    }
}
