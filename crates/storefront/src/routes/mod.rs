//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page
//! GET  /health                      - Health check
//!
//! # Products
//! GET  /products                    - Product listing (?search=&sort=)
//! GET  /products/{id}               - Product detail (?quantity=)
//! POST /products/{id}/wishlist      - Toggle wishlist
//! POST /products/{id}/cart          - Add-to-cart notice
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                   - Dashboard
//! GET  /dashboard/add-product       - Product creation form
//! POST /dashboard/add-product       - Product creation form actions
//! GET  /profile                     - Signed-in user
//!
//! # Auth
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! GET  /register                    - Registration wizard
//! POST /register                    - Registration wizard actions
//! POST /logout                      - Logout action
//!
//! # Theme
//! POST /theme                       - Toggle light/dark
//! ```

pub mod auth;
pub mod dashboard;
pub mod home;
pub mod products;
pub mod profile;
pub mod theme;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/wishlist", post(products::toggle_wishlist))
        .route("/{id}/cart", post(products::add_to_cart))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard::index)).route(
        "/add-product",
        get(dashboard::add_product_page).post(dashboard::add_product_action),
    )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/dashboard", dashboard_routes())
        .route("/profile", get(profile::show))
        .route("/theme", post(theme::toggle))
        .merge(auth_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
