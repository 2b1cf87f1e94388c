//! One-shot notifications.
//!
//! Handlers queue a [`Flash`] before redirecting; the next rendered page
//! drains the queue and shows each message once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class for the notification banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
        }
    }
}

/// A notification shown once on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// A success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Queue this notification in the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn push(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        let mut queue: Vec<Self> = session.get(keys::FLASH).await?.unwrap_or_default();
        queue.push(self);
        session.insert(keys::FLASH, queue).await
    }

    /// Remove and return all queued notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn take_all(session: &Session) -> Result<Vec<Self>, tower_sessions::session::Error> {
        Ok(session
            .remove::<Vec<Self>>(keys::FLASH)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_drained_once() {
        let session = session();
        Flash::success("Tag added").push(&session).await.unwrap();
        Flash::error("This tag is already added")
            .push(&session)
            .await
            .unwrap();

        let taken = Flash::take_all(&session).await.unwrap();
        assert_eq!(
            taken,
            vec![
                Flash::success("Tag added"),
                Flash::error("This tag is already added"),
            ]
        );
        assert!(Flash::take_all(&session).await.unwrap().is_empty());
    }
}
