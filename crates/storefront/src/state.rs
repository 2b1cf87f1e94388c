//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::StorefrontConfig;
use crate::theme::ThemeContext;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client, configuration and theme.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    theme: ThemeContext,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The theme starts at the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(config.backend_url.clone())?;
        let theme = ThemeContext::new(config.default_theme);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                theme,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the process-wide theme.
    #[must_use]
    pub fn theme(&self) -> &ThemeContext {
        &self.inner.theme
    }
}
