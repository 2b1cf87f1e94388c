//! Site-wide colour theme.
//!
//! The theme is process-wide state owned by [`ThemeContext`]. Handlers and
//! templates read it through the context; nothing else keeps its own copy.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Error returned when a string does not name a [`Theme`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme: {0} (expected 'light' or 'dark')")]
pub struct ThemeParseError(String);

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Class applied to the `<html>` element.
    #[must_use]
    pub const fn html_class(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

/// Shared handle to the current theme.
///
/// Cloning yields another handle to the same value.
#[derive(Debug, Clone)]
pub struct ThemeContext {
    sender: Arc<watch::Sender<Theme>>,
}

impl ThemeContext {
    /// Create a context holding `initial`.
    #[must_use]
    pub fn new(initial: Theme) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The current theme.
    #[must_use]
    pub fn get(&self) -> Theme {
        *self.sender.borrow()
    }

    /// Replace the theme, notifying subscribers when it changes.
    pub fn set(&self, theme: Theme) {
        self.sender.send_if_modified(|current| {
            if *current == theme {
                false
            } else {
                *current = theme;
                true
            }
        });
    }

    /// Flip between light and dark. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    /// Subscribe to theme changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.sender.subscribe()
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_toggle_flips() {
        let theme = ThemeContext::default();
        assert_eq!(theme.get(), Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.get(), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
    }

    #[test]
    fn test_set_without_subscribers() {
        let theme = ThemeContext::new(Theme::Dark);
        theme.set(Theme::Light);
        assert_eq!(theme.get(), Theme::Light);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let theme = ThemeContext::default();
        let handle = theme.clone();
        let mut rx = theme.subscribe();

        handle.set(Theme::Dark);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);

        // Setting the same value is not a change.
        handle.set(Theme::Dark);
        assert!(!rx.has_changed().unwrap());
    }
}
