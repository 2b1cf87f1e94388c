//! Integration tests for MomosMart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p momos-mart-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] serves the product
//! REST API on an ephemeral local port, and [`Browser`] drives the real
//! storefront router in-process, carrying the session cookie between
//! requests.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, Response, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use momos_mart_storefront::app;
use momos_mart_storefront::config::StorefrontConfig;
use momos_mart_storefront::state::AppState;

/// Boxed error for test helpers.
pub type TestError = Box<dyn Error + Send + Sync>;

/// Password of the seeded account `ada@example.com`.
pub const SEEDED_PASSWORD: &str = "abc12345";

/// Email the fake backend refuses to register.
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    products: Mutex<Vec<Value>>,
    accounts: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stand-in for the product REST backend.
#[derive(Clone)]
pub struct FakeBackend {
    state: Arc<FakeState>,
    url: Url,
}

impl FakeBackend {
    /// Start the fake backend on `127.0.0.1` with an ephemeral port.
    ///
    /// It starts with two products and the account
    /// `ada@example.com` / [`SEEDED_PASSWORD`].
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn spawn() -> Result<Self, TestError> {
        let state = Arc::new(FakeState::default());
        lock(&state.products).extend([
            json!({
                "_id": "65f0a1",
                "name": "Espresso Grinder",
                "description": "Burr grinder for espresso",
                "price": 189.0,
                "images": ["https://img.example/grinder.jpg"]
            }),
            json!({
                "_id": 7,
                "name": "Pour-over Kettle",
                "description": "Gooseneck kettle",
                "price": 45.5,
                "image": "https://img.example/kettle.jpg"
            }),
        ]);
        lock(&state.accounts).insert("ada@example.com".to_string(), SEEDED_PASSWORD.to_string());

        let router = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route("/api/products/{id}", get(get_product))
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(sign_in))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}", listener.local_addr()?))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { state, url })
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests received for `method` and `path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

type Shared = State<Arc<FakeState>>;

fn record(state: &FakeState, method: &str, path: &str, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    lock(&state.requests).push(RecordedRequest {
        method: method.to_string(),
        path: path.to_string(),
        authorization,
        body,
    });
}

async fn list_products(State(state): Shared) -> Json<Vec<Value>> {
    Json(lock(&state.products).clone())
}

async fn get_product(State(state): Shared, Path(id): Path<String>) -> impl IntoResponse {
    let products = lock(&state.products);
    let found = products.iter().find(|p| match &p["_id"] {
        Value::String(s) => *s == id,
        other => other.to_string() == id,
    });
    match found {
        Some(product) => (StatusCode::OK, Json(product.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Product not found"}))).into_response(),
    }
}

async fn create_product(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, "POST", "/api/products", &headers, body.clone());

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
    }

    let mut products = lock(&state.products);
    let mut created = body;
    created["_id"] = json!(format!("new-{}", products.len() + 1));
    products.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn register(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, "POST", "/api/auth/register", &headers, body.clone());

    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email == TAKEN_EMAIL {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "User already exists"}))).into_response();
    }
    let password = body["password"].as_str().unwrap_or_default().to_string();
    lock(&state.accounts).insert(email, password);
    (StatusCode::CREATED, Json(json!({"message": "User registered"}))).into_response()
}

async fn sign_in(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, "POST", "/api/auth/login", &headers, body.clone());

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let known = lock(&state.accounts).get(email).is_some_and(|p| p == password);
    if !known {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"}))).into_response();
    }

    Json(json!({
        "token": format!("token-{email}"),
        "user": {"_id": "u-1", "firstName": "Ada", "lastName": "Lovelace", "email": email}
    }))
    .into_response()
}

/// Build the storefront router against `backend_url`.
///
/// # Errors
///
/// Returns error if the configuration or state cannot be built.
pub fn storefront(backend_url: &Url) -> Result<Router, TestError> {
    let backend = backend_url.to_string();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_BACKEND_URL" => Some(backend.clone()),
        "STOREFRONT_BASE_URL" => Some("http://shop.test".to_string()),
        _ => None,
    })?;
    Ok(app(AppState::new(config)?))
}

/// Drives a router in-process, keeping the session cookie like a browser.
pub struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// GET `uri`.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be built or served.
    pub async fn get(&mut self, uri: &str) -> Result<Response<Body>, TestError> {
        let request = self.request("GET", uri).body(Body::empty())?;
        self.send(request).await
    }

    /// POST an urlencoded form to `uri`.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be built or served.
    pub async fn post_form(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
    ) -> Result<Response<Body>, TestError> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Result<Response<Body>, TestError> {
        let response = self.app.clone().oneshot(request).await?;
        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }
        Ok(response)
    }
}

/// Read a response body as text.
///
/// # Errors
///
/// Returns error if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> Result<String, TestError> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
