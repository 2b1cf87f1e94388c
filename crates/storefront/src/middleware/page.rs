//! Per-page context shared by every rendered template.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::auth::load_current_user;
use crate::error::AppError;
use crate::models::{CurrentUser, Flash};
use crate::state::AppState;
use crate::theme::Theme;

/// Extractor bundling the session, signed-in user and current theme.
///
/// Handlers call [`Page::chrome`] only when they are about to render, so
/// queued notifications survive redirects.
pub struct Page {
    session: Session,
    user: Option<CurrentUser>,
    theme: Theme,
    path: String,
}

impl FromRequestParts<AppState> for Page {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        let user = load_current_user(&session).await;
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string);

        Ok(Self {
            session,
            user,
            theme: state.theme().get(),
            path,
        })
    }
}

impl Page {
    /// The visitor's session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Queue a notification for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn flash(&self, flash: Flash) -> Result<(), AppError> {
        flash.push(&self.session).await?;
        Ok(())
    }

    /// Template context, draining queued notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn chrome(&self) -> Result<Chrome, AppError> {
        Ok(Chrome {
            user_name: self.user.as_ref().map(|u| u.name.clone()),
            theme: self.theme,
            flashes: Flash::take_all(&self.session).await?,
            path: self.path.clone(),
        })
    }
}

/// Values the base layout needs.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub user_name: Option<String>,
    pub theme: Theme,
    pub flashes: Vec<Flash>,
    /// Path and query of the current page, for return links.
    pub path: String,
}
