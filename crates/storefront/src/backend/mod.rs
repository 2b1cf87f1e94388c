//! Product backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth: no local sync, no response cache
//! - Read endpoints go through [`BackendClient::fetch_with_fallback`], which
//!   substitutes the built-in sample catalog when the backend is unreachable
//! - Write endpoints that need a signed-in user go through
//!   [`AuthenticatedBackend`], which attaches the session's bearer token
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products        product collection
//! GET  /api/products/{id}   single product
//! POST /api/products        create product (bearer token)
//! POST /api/auth/register   create account
//! POST /api/auth/login      exchange credentials for a bearer token
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use momos_mart_storefront::backend::BackendClient;
//!
//! let backend = BackendClient::new(config.backend_url.clone())?;
//!
//! // Never fails on network errors: falls back to the sample catalog
//! let products = backend.list_products().await?;
//! if products.is_fallback() {
//!     tracing::info!("showing sample products");
//! }
//! ```

mod authed;
pub mod fallback;
pub mod types;

pub use authed::AuthenticatedBackend;
pub use types::*;

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use momos_mart_core::{Email, ProductId};

/// Path of the product collection endpoint.
pub const PRODUCTS_PATH: &str = "/api/products";

/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Path of the sign-in endpoint.
pub const SIGN_IN_PATH: &str = "/api/auth/login";

/// Errors that can occur when talking to the product backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, DNS, TLS, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API request failed: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The backend rejected the request with an explanatory `{error}` body.
    #[error("{0}")]
    Rejected(String),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No signed-in user or no bearer token in the session.
    #[error("No authentication token available")]
    MissingToken,
}

impl BackendError {
    /// Whether the backend reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

/// Where a value returned by [`BackendClient::fetch_with_fallback`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fresh response from the backend.
    Backend,
    /// Substituted built-in data after a failed fetch.
    Fallback,
}

/// A value paired with its [`DataSource`].
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// The fetched or substituted value.
    pub value: T,
    /// Where the value came from.
    pub source: DataSource,
}

impl<T> Fetched<T> {
    /// Whether the value is built-in fallback data.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    /// Discard the source and return the value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Client for the product backend.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("momos-mart-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The configured backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for an API path such as `/api/products`.
    ///
    /// The path is appended to the base URL, so a backend mounted under a
    /// prefix (`https://host/shop`) keeps that prefix.
    ///
    /// # Errors
    ///
    /// Returns error if the resulting URL is malformed.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-success status, or a body that
    /// does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// GET a JSON document, substituting `fallback()` on any failure.
    ///
    /// There is no retry: a single failed attempt (network error,
    /// non-success status, undecodable body) triggers the fallback. When the
    /// fallback has nothing to offer (`None`), the original error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the fetch error only when `fallback` yields `None`.
    pub async fn fetch_with_fallback<T, F>(
        &self,
        path: &str,
        fallback: F,
    ) -> Result<Fetched<T>, BackendError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Option<T>,
    {
        match self.get_json(path).await {
            Ok(value) => Ok(Fetched {
                value,
                source: DataSource::Backend,
            }),
            Err(e) => {
                let Some(value) = fallback() else {
                    tracing::warn!(path, error = %e, "Backend fetch failed, no fallback available");
                    return Err(e);
                };
                tracing::warn!(path, error = %e, "Backend fetch failed, using fallback data");
                Ok(Fetched {
                    value,
                    source: DataSource::Fallback,
                })
            }
        }
    }

    /// Fetch the product collection, falling back to the sample catalog.
    ///
    /// # Errors
    ///
    /// Only fails if an endpoint URL cannot be built; fetch failures are
    /// replaced by the sample catalog.
    pub async fn list_products(&self) -> Result<Fetched<Vec<ProductRecord>>, BackendError> {
        self.fetch_with_fallback(PRODUCTS_PATH, || Some(fallback::sample_products()))
            .await
    }

    /// Fetch one product, falling back to the sample catalog by numeric ID.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the backend fails and no sample product
    /// has the same numeric ID.
    pub async fn get_product(&self, id: &ProductId) -> Result<Fetched<ProductRecord>, BackendError> {
        let path = format!("{PRODUCTS_PATH}/{}", urlencoding::encode(id.as_str()));
        self.fetch_with_fallback(&path, || fallback::find_sample(id))
            .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] with the backend's `{error}`
    /// message when it refuses the registration, or another variant on
    /// transport failure.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), BackendError> {
        let url = self.endpoint(REGISTER_PATH)?;
        let response = self.client.post(url).json(request).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the credentials or is unreachable.
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignInResponse, BackendError> {
        let url = self.endpoint(SIGN_IN_PATH)?;
        let body = SignInRequest {
            email: email.clone(),
            password: password.clone(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into [`BackendError::Status`].
///
/// Authenticated requests report failures this way whatever the body says.
pub(crate) async fn ensure_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(BackendError::Status {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}

/// Turn a non-success response into a [`BackendError`].
///
/// A 404 always becomes [`BackendError::Status`] so callers can tell a
/// missing resource apart. Otherwise a JSON `{error}` (or `{message}`) body
/// becomes [`BackendError::Rejected`] and anything else [`BackendError::Status`].
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    match ensure_status(response).await {
        Err(BackendError::Status { status, message })
            if status != StatusCode::NOT_FOUND.as_u16() =>
        {
            Err(match rejection_message(&message) {
                Some(message) => BackendError::Rejected(message),
                None => BackendError::Status { status, message },
            })
        }
        other => other,
    }
}

fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(ApiErrorBody::into_message)
}
