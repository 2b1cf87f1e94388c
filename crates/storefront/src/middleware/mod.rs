//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Route guard (redirects by path and sign-in state)

pub mod auth;
pub mod guard;
pub mod page;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use guard::route_guard_middleware;
pub use page::{Chrome, Page};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
