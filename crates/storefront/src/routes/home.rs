//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::products::ProductView;
use crate::error::Result;
use crate::filters;
use crate::middleware::{Chrome, Page};
use crate::state::AppState;

/// Number of products shown as featured.
const FEATURED_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    /// First featured product, shown large.
    pub highlight: Option<ProductView>,
    /// Remaining featured products.
    pub featured: Vec<ProductView>,
}

/// Display the home page.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: Page) -> Result<Response> {
    let products = state.backend().list_products().await?.into_inner();

    let mut featured: Vec<ProductView> = products
        .iter()
        .take(FEATURED_COUNT)
        .map(ProductView::from)
        .collect();
    let highlight = (!featured.is_empty()).then(|| featured.remove(0));

    Ok(HomeTemplate {
        chrome: page.chrome().await?,
        highlight,
        featured,
    }
    .into_response())
}
