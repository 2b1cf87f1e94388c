//! Session-related types.
//!
//! Types stored in the session for authentication state.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use momos_mart_core::{Email, UserId};

use crate::backend::types::expose_secret;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user and
/// call the backend on their behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID, when the backend reports one.
    pub id: Option<UserId>,
    /// Name shown in the navigation bar.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Bearer token issued by the backend.
    #[serde(serialize_with = "expose_secret")]
    backend_token: SecretString,
}

impl CurrentUser {
    /// Create a new session user.
    #[must_use]
    pub const fn new(
        id: Option<UserId>,
        name: String,
        email: Email,
        backend_token: SecretString,
    ) -> Self {
        Self {
            id,
            name,
            email,
            backend_token,
        }
    }

    /// The backend bearer token.
    #[must_use]
    pub const fn backend_token(&self) -> &SecretString {
        &self.backend_token
    }
}

/// Session keys for per-visitor state.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for queued one-shot notifications.
    pub const FLASH: &str = "flash";

    /// Key for the visitor's wishlisted product IDs.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the in-progress product creation draft.
    pub const PRODUCT_DRAFT: &str = "product_draft";

    /// Key for the in-progress registration wizard.
    pub const REGISTRATION_DRAFT: &str = "registration_draft";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_session_round_trip_keeps_token() {
        let user = CurrentUser::new(
            Some(UserId::new("u1")),
            "Ada Lovelace".to_string(),
            Email::parse("ada@example.com").unwrap(),
            SecretString::from("tok-123"),
        );

        let json = serde_json::to_value(&user).unwrap();
        let restored: CurrentUser = serde_json::from_value(json).unwrap();

        assert_eq!(restored.backend_token().expose_secret(), "tok-123");
        assert_eq!(restored.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_debug_redacts_token() {
        let user = CurrentUser::new(
            None,
            "Ada".to_string(),
            Email::parse("ada@example.com").unwrap(),
            SecretString::from("tok-123"),
        );
        assert!(!format!("{user:?}").contains("tok-123"));
    }
}
