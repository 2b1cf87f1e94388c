//! Domain models for the storefront.
//!
//! - [`session`] - Signed-in user and session keys
//! - [`flash`] - One-shot notifications shown on the next page

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashKind};
pub use session::{CurrentUser, keys as session_keys};
