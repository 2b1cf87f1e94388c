//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! The product backend hands out opaque string identifiers, but older
//! records and the built-in sample catalog use plain integers, so every ID
//! deserializes from either a JSON string or a JSON number.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or a number
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `as_number()`
/// - `From<String>`, `From<&str>`, `From<u64>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use momos_mart_core::define_id;
/// define_id!(ReviewId);
/// define_id!(OrderId);
///
/// let review_id = ReviewId::new("1");
/// let order_id = OrderId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: ReviewId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Interpret the ID as a non-negative integer, if it is one.
            #[must_use]
            pub fn as_number(&self) -> Option<u64> {
                self.0.trim().parse().ok()
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                #[derive(::serde::Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Unsigned(u64),
                    Signed(i64),
                }

                Ok(match Raw::deserialize(deserializer)? {
                    Raw::Text(s) => Self(s),
                    Raw::Unsigned(n) => Self(n.to_string()),
                    Raw::Signed(n) => Self(n.to_string()),
                })
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: ProductId = serde_json::from_str("\"65f1c0ffee\"").unwrap();
        assert_eq!(id.as_str(), "65f1c0ffee");
        assert_eq!(id.as_number(), None);
    }

    #[test]
    fn test_deserialize_from_number() {
        let id: ProductId = serde_json::from_str("3").unwrap();
        assert_eq!(id.as_str(), "3");
        assert_eq!(id.as_number(), Some(3));
    }

    #[test]
    fn test_serializes_as_string() {
        let id = ProductId::from(2_u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2\"");
    }

    #[test]
    fn test_display() {
        let id = UserId::new("abc");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_as_number_ignores_non_numeric() {
        assert_eq!(ProductId::new("2abc").as_number(), None);
        assert_eq!(ProductId::new("-1").as_number(), None);
    }
}
