//! Theme toggle route handler.

use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;

use crate::state::AppState;

/// Theme toggle form data.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeForm {
    /// Page to go back to.
    #[serde(default)]
    pub return_to: String,
}

/// Only same-site absolute paths are followed.
fn safe_return_path(path: &str) -> &str {
    if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') {
        path
    } else {
        "/"
    }
}

/// Flip the site-wide theme and go back.
pub async fn toggle(State(state): State<AppState>, Form(form): Form<ThemeForm>) -> Redirect {
    let theme = state.theme().toggle();
    tracing::info!(theme = theme.html_class(), "Theme toggled");
    Redirect::to(safe_return_path(&form.return_to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path("/products?sort=price-low"), "/products?sort=price-low");
        assert_eq!(safe_return_path("https://evil.example"), "/");
        assert_eq!(safe_return_path("//evil.example"), "/");
        assert_eq!(safe_return_path(""), "/");
    }
}
