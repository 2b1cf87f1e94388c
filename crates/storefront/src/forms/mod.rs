//! Form state and validation.
//!
//! Drafts are plain data stored in the visitor's session; handlers load
//! them, apply one action, and store them back.

pub mod entries;
pub mod product;
pub mod registration;

pub use entries::{EntryKind, EntryList, EntryRejection};
pub use product::{ProductDraft, ProductFields, ProductFormError, generate_sku};
pub use registration::{
    PasswordChecks, PasswordStrength, PersonalInfo, RegistrationDraft, RegistrationError,
    RegistrationStep, SecurityInput,
};

use serde::{Deserialize, Deserializer};

/// HTML checkboxes are present when ticked and absent otherwise.
pub(crate) fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.is_some_and(|v| !matches!(v.as_str(), "" | "false" | "off")))
}
