//! Bearer-token requests on behalf of the signed-in user.

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{BackendClient, BackendError, NewProduct, PRODUCTS_PATH, ProductRecord, ensure_status};
use crate::models::CurrentUser;

/// A [`BackendClient`] bound to the signed-in user's bearer token.
///
/// Obtained from [`BackendClient::authenticated`]. Each call makes a single
/// attempt: no retry, no backoff, no timeout beyond the client defaults.
pub struct AuthenticatedBackend<'a> {
    backend: &'a BackendClient,
    token: &'a SecretString,
}

impl std::fmt::Debug for AuthenticatedBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedBackend")
            .field("base_url", &self.backend.base_url().as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl BackendClient {
    /// Bind the client to the session user's bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingToken`] without touching the network
    /// when there is no signed-in user or the user's token is empty.
    pub fn authenticated<'a>(
        &'a self,
        user: Option<&'a CurrentUser>,
    ) -> Result<AuthenticatedBackend<'a>, BackendError> {
        let token = user
            .map(CurrentUser::backend_token)
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or(BackendError::MissingToken)?;

        Ok(AuthenticatedBackend {
            backend: self,
            token,
        })
    }
}

impl AuthenticatedBackend<'_> {
    /// Send a JSON request with `Authorization: Bearer <token>` and decode
    /// the JSON response.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-success status, or a body that
    /// does not decode as `T`.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.backend.endpoint(path)?;
        let mut request = self
            .backend
            .http()
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose_secret()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = ensure_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Create a product. Returns the stored record with its new ID.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the product or is unreachable.
    pub async fn create_product(&self, product: &NewProduct) -> Result<ProductRecord, BackendError> {
        self.send_json(Method::POST, PRODUCTS_PATH, Some(product))
            .await
    }
}
