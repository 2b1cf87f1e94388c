//! Product detail view state.
//!
//! Quantity and wishlist are visitor-local: neither is sent to the backend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use url::Url;

use momos_mart_core::ProductId;

use crate::models::session_keys;

/// Quantity chosen with the detail page stepper. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest quantity.
    pub const MIN: Self = Self(1);

    /// Clamp a requested quantity to the floor of 1.
    #[must_use]
    pub fn new(requested: Option<u32>) -> Self {
        Self(requested.unwrap_or(1).max(1))
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One less, stopping at 1.
    #[must_use]
    pub const fn decrement(self) -> Self {
        if self.0 > 1 { Self(self.0 - 1) } else { Self::MIN }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

/// Products the visitor has wishlisted, kept in their session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist(BTreeSet<ProductId>);

impl Wishlist {
    /// Load the visitor's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .get(session_keys::WISHLIST)
            .await?
            .unwrap_or_default())
    }

    /// Persist the wishlist to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::WISHLIST, self).await
    }

    /// Whether `id` is wishlisted.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.0.contains(id)
    }

    /// Add or remove `id`. Returns `true` if it is now wishlisted.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }
}

/// Absolute link to a product page, for sharing.
///
/// Falls back to the relative path if the base URL cannot be joined.
#[must_use]
pub fn share_url(base_url: &str, id: &ProductId) -> String {
    let path = format!("/products/{}", urlencoding::encode(id.as_str()));
    Url::parse(base_url)
        .and_then(|base| base.join(&path))
        .map_or(path, String::from)
}
