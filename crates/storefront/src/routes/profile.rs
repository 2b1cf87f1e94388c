//! Profile route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::error::Result;
use crate::filters;
use crate::middleware::{Chrome, Page, RequireAuth};

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub chrome: Chrome,
    pub name: String,
    pub email: String,
    pub user_id: Option<String>,
}

/// Display the signed-in user's profile.
pub async fn show(RequireAuth(user): RequireAuth, page: Page) -> Result<Response> {
    Ok(ProfileTemplate {
        chrome: page.chrome().await?,
        name: user.name,
        email: user.email.into_inner(),
        user_id: user.id.map(|id| id.to_string()),
    }
    .into_response())
}
