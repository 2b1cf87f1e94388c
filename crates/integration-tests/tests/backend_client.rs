//! Integration tests for the product backend client.
//!
//! Each test starts its own [`FakeBackend`] on an ephemeral port.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use momos_mart_core::{Email, Price, ProductId};
use momos_mart_integration_tests::{FakeBackend, SEEDED_PASSWORD, TAKEN_EMAIL};
use momos_mart_storefront::backend::{
    BackendClient, BackendError, DataSource, NewProduct, RegistrationRequest,
};
use momos_mart_storefront::models::CurrentUser;

fn client(backend: &FakeBackend) -> BackendClient {
    BackendClient::new(backend.url().clone()).unwrap()
}

fn new_product() -> NewProduct {
    NewProduct {
        name: "Milk Frother".to_string(),
        description: "Handheld frother".to_string(),
        price: Price::parse("19.99").unwrap(),
        full_description: "Handheld frother".to_string(),
        category: None,
        brand: String::new(),
        stock_quantity: 3,
        sku: "SKU-TEST00001".to_string(),
        tags: vec!["coffee".to_string()],
        features: Vec::new(),
        images: vec!["https://img.example/frother.jpg".to_string()],
    }
}

fn registration(email: &str) -> RegistrationRequest {
    RegistrationRequest {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: Email::parse(email).unwrap(),
        phone: String::new(),
        password: SecretString::from("Secret123"),
        address: String::new(),
        city: String::new(),
        subscribe_newsletter: false,
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_list_products_comes_from_backend() {
    let backend = FakeBackend::spawn().await.unwrap();

    let fetched = client(&backend).list_products().await.unwrap();

    assert_eq!(fetched.source, DataSource::Backend);
    let names: Vec<_> = fetched.value.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Espresso Grinder", "Pour-over Kettle"]);
}

#[tokio::test]
async fn test_list_products_falls_back_when_backend_is_down() {
    // Nothing listens on the discard port.
    let client = BackendClient::new(Url::parse("http://127.0.0.1:9").unwrap()).unwrap();

    let fetched = client.list_products().await.unwrap();

    assert!(fetched.is_fallback());
    assert!(!fetched.value.is_empty());
}

#[tokio::test]
async fn test_get_product_by_string_and_numeric_id() {
    let backend = FakeBackend::spawn().await.unwrap();
    let client = client(&backend);

    let grinder = client.get_product(&ProductId::new("65f0a1")).await.unwrap();
    assert!(!grinder.is_fallback());
    assert_eq!(grinder.value.main_image(), Some("https://img.example/grinder.jpg"));

    let kettle = client.get_product(&ProductId::new("7")).await.unwrap();
    assert_eq!(kettle.value.name, "Pour-over Kettle");
    // Legacy single-image records still expose their image.
    assert_eq!(kettle.value.all_images(), ["https://img.example/kettle.jpg"]);
}

#[tokio::test]
async fn test_get_missing_product_without_sample_is_not_found() {
    let backend = FakeBackend::spawn().await.unwrap();

    let err = client(&backend)
        .get_product(&ProductId::new("does-not-exist"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_sign_in_returns_token_and_profile() {
    let backend = FakeBackend::spawn().await.unwrap();
    let email = Email::parse("ada@example.com").unwrap();

    let response = client(&backend)
        .sign_in(&email, &SecretString::from(SEEDED_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.token.expose_secret(), "token-ada@example.com");
    let user = response.user.unwrap();
    assert_eq!(user.display_name().as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn test_sign_in_with_wrong_password_fails() {
    let backend = FakeBackend::spawn().await.unwrap();
    let email = Email::parse("ada@example.com").unwrap();

    let result = client(&backend)
        .sign_in(&email, &SecretString::from("wrong"))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_register_sends_camel_case_body_without_confirmation() {
    let backend = FakeBackend::spawn().await.unwrap();

    client(&backend)
        .register(&registration("grace@example.com"))
        .await
        .unwrap();

    let requests = backend.requests_to("POST", "/api/auth/register");
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body["firstName"], "Grace");
    assert_eq!(body["password"], "Secret123");
    assert_eq!(body["subscribeNewsletter"], false);
    assert!(body.get("confirmPassword").is_none());
    assert!(body.get("acceptTerms").is_none());
}

#[tokio::test]
async fn test_register_rejection_carries_backend_message() {
    let backend = FakeBackend::spawn().await.unwrap();

    let err = client(&backend)
        .register(&registration(TAKEN_EMAIL))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Rejected(ref m) if m == "User already exists"));
}

// =============================================================================
// Authenticated requests
// =============================================================================

#[tokio::test]
async fn test_create_product_sends_bearer_token() {
    let backend = FakeBackend::spawn().await.unwrap();
    let client = client(&backend);
    let user = CurrentUser::new(
        None,
        "Ada".to_string(),
        Email::parse("ada@example.com").unwrap(),
        SecretString::from("token-ada@example.com"),
    );

    let created = client
        .authenticated(Some(&user))
        .unwrap()
        .create_product(&new_product())
        .await
        .unwrap();

    assert_eq!(created.name, "Milk Frother");
    assert_eq!(created.id.as_str(), "new-3");

    let requests = backend.requests_to("POST", "/api/products");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer token-ada@example.com")
    );
    assert_eq!(requests[0].body["stockQuantity"], 3);
    assert_eq!(requests[0].body["price"], 19.99);
}

#[tokio::test]
async fn test_refused_token_keeps_status() {
    let backend = FakeBackend::spawn().await.unwrap();
    let client = client(&backend);
    let user = CurrentUser::new(
        None,
        "Ada".to_string(),
        Email::parse("ada@example.com").unwrap(),
        SecretString::from("expired"),
    );

    let err = client
        .authenticated(Some(&user))
        .unwrap()
        .create_product(&new_product())
        .await
        .unwrap_err();

    // The `{error}` body does not hide the status.
    assert!(matches!(err, BackendError::Status { status: 401, .. }));
    assert_eq!(err.to_string(), "API request failed: 401");
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let backend = FakeBackend::spawn().await.unwrap();
    let client = client(&backend);

    let err = client.authenticated(None).unwrap_err();
    assert!(matches!(err, BackendError::MissingToken));

    let blank = CurrentUser::new(
        None,
        "Ada".to_string(),
        Email::parse("ada@example.com").unwrap(),
        SecretString::from("  "),
    );
    assert!(matches!(
        client.authenticated(Some(&blank)),
        Err(BackendError::MissingToken)
    ));

    assert!(backend.requests().is_empty());
}
