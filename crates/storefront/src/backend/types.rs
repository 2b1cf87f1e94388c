//! Wire types exchanged with the product backend.
//!
//! The backend speaks camelCase JSON with Mongo-style `_id` keys.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use momos_mart_core::{Category, Email, Price, ProductId, UserId};

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?auto=compress&cs=tinysrgb&w=500&h=300";

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Single-image field used by older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ProductRecord {
    /// The main image: first of `images`, else the legacy `image`.
    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.image.as_deref())
    }

    /// All images in display order, including a legacy single image.
    #[must_use]
    pub fn all_images(&self) -> Vec<&str> {
        if self.images.is_empty() {
            self.image.as_deref().into_iter().collect()
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    /// The long description, or the short one when the long one is blank.
    #[must_use]
    pub fn long_description(&self) -> &str {
        self.full_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.description)
    }
}

/// Normalized payload for `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub full_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub brand: String,
    pub stock_quantity: u32,
    pub sku: String,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
}

/// Payload for `POST /api/auth/register`.
///
/// Carries neither the password confirmation nor the terms checkbox; both
/// are enforced before the request is built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    pub address: String,
    pub city: String,
    pub subscribe_newsletter: bool,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: Email,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(alias = "backendToken", alias = "accessToken")]
    pub token: SecretString,
    #[serde(default)]
    pub user: Option<BackendUser>,
}

/// User profile returned alongside a bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl BackendUser {
    /// Best display name: `name`, else "first last", else `None`.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name.to_owned());
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// The explanatory text, preferring `error` over `message`.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Serialize a secret by exposing it. Only for outgoing request bodies and
/// session storage.
pub(crate) fn expose_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_record_from_backend_json() {
        let json = r#"{
            "_id": "65f0a1",
            "name": "Desk Lamp",
            "description": "Warm light",
            "price": 39.5,
            "fullDescription": "A warm LED desk lamp",
            "images": ["https://img.example/lamp.jpg"],
            "stockQuantity": 12,
            "tags": ["home"]
        }"#;
        let record: ProductRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_str(), "65f0a1");
        assert_eq!(record.price.amount(), Decimal::new(395, 1));
        assert_eq!(record.main_image(), Some("https://img.example/lamp.jpg"));
        assert_eq!(record.long_description(), "A warm LED desk lamp");
        assert_eq!(record.stock_quantity, Some(12));
        assert!(record.features.is_empty());
    }

    #[test]
    fn test_product_record_legacy_single_image() {
        let json = r#"{"_id": 4, "name": "Speaker", "description": "Loud", "price": 129.99,
                       "image": "https://img.example/speaker.jpg"}"#;
        let record: ProductRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_number(), Some(4));
        assert_eq!(record.main_image(), Some("https://img.example/speaker.jpg"));
        assert_eq!(record.all_images(), vec!["https://img.example/speaker.jpg"]);
        assert_eq!(record.long_description(), "Loud");
    }

    #[test]
    fn test_new_product_serializes_camel_case() {
        let product = NewProduct {
            name: "Mug".to_string(),
            description: "Ceramic".to_string(),
            price: Price::parse("12.5").unwrap(),
            full_description: "Ceramic".to_string(),
            category: None,
            brand: String::new(),
            stock_quantity: 0,
            sku: "SKU-ABC123XYZ".to_string(),
            tags: vec![],
            features: vec![],
            images: vec!["https://img.example/mug.jpg".to_string()],
        };
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["fullDescription"], "Ceramic");
        assert_eq!(value["stockQuantity"], 0);
        assert_eq!(value["price"], 12.5);
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_registration_request_exposes_password_only_on_the_wire() {
        let request = RegistrationRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: String::new(),
            password: SecretString::from("abc12345"),
            address: String::new(),
            city: String::new(),
            subscribe_newsletter: true,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["password"], "abc12345");
        assert_eq!(value["subscribeNewsletter"], true);
        assert!(value.get("confirmPassword").is_none());
        assert!(!format!("{request:?}").contains("abc12345"));
    }

    #[test]
    fn test_sign_in_response_token_aliases() {
        let response: SignInResponse =
            serde_json::from_str(r#"{"backendToken": "tok", "user": {"firstName": "Ada"}}"#)
                .unwrap();
        assert_eq!(response.token.expose_secret(), "tok");
        assert_eq!(
            response.user.unwrap().display_name().as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn test_api_error_body_message() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error": "Email taken"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Email taken"));

        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_message(), None);
    }
}
