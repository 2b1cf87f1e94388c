//! Product creation draft.
//!
//! The draft lives in the visitor's session between form actions. Each
//! POST carries every text field, so the draft is refreshed from the form
//! before the requested action runs.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use momos_mart_core::{Category, Price, PriceError};

use super::entries::{EntryKind, EntryList, EntryRejection};
use crate::backend::NewProduct;

const SKU_PREFIX: &str = "SKU-";
const SKU_LEN: usize = 9;
const SKU_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Why a draft cannot be submitted. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductFormError {
    #[error("Please fill in all required fields (Name, Description, Price)")]
    MissingRequired,

    #[error("Please enter a valid price")]
    InvalidPrice(#[source] PriceError),

    #[error("Please enter a valid stock quantity")]
    InvalidStock,

    #[error("Please add at least one image URL")]
    MissingImage,

    #[error("Please select a valid category")]
    InvalidCategory,
}

/// Text fields of the product form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: String,
    pub full_description: String,
    pub category: String,
    pub brand: String,
    pub stock_quantity: String,
    pub sku: String,
    pub image_input: String,
    pub tag_input: String,
    pub feature_input: String,
}

impl ProductFields {
    fn buffer(&self, kind: EntryKind) -> &str {
        match kind {
            EntryKind::Image => &self.image_input,
            EntryKind::Tag => &self.tag_input,
            EntryKind::Feature => &self.feature_input,
        }
    }

    fn buffer_mut(&mut self, kind: EntryKind) -> &mut String {
        match kind {
            EntryKind::Image => &mut self.image_input,
            EntryKind::Tag => &mut self.tag_input,
            EntryKind::Feature => &mut self.feature_input,
        }
    }
}

/// In-progress product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub fields: ProductFields,
    pub images: EntryList,
    pub tags: EntryList,
    pub features: EntryList,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            fields: ProductFields::default(),
            images: EntryList::new(EntryKind::Image),
            tags: EntryList::new(EntryKind::Tag),
            features: EntryList::new(EntryKind::Feature),
        }
    }
}

impl ProductDraft {
    /// Replace the text fields with freshly submitted ones.
    pub fn update_fields(&mut self, fields: ProductFields) {
        self.fields = fields;
    }

    fn list_mut(&mut self, kind: EntryKind) -> &mut EntryList {
        match kind {
            EntryKind::Image => &mut self.images,
            EntryKind::Tag => &mut self.tags,
            EntryKind::Feature => &mut self.features,
        }
    }

    /// Move the pending input for `kind` into its list.
    ///
    /// The input buffer is cleared on success and kept on rejection.
    ///
    /// # Errors
    ///
    /// Returns the [`EntryRejection`] from the list.
    pub fn add_entry(&mut self, kind: EntryKind) -> Result<(), EntryRejection> {
        let raw = self.fields.buffer_mut(kind).clone();
        self.list_mut(kind).try_add(&raw)?;
        self.fields.buffer_mut(kind).clear();
        Ok(())
    }

    /// Kinds whose input box holds text that has not been added yet.
    #[must_use]
    pub fn pending_entries(&self) -> Vec<EntryKind> {
        EntryKind::ALL
            .into_iter()
            .filter(|kind| !self.fields.buffer(*kind).trim().is_empty())
            .collect()
    }

    /// Add every pending input to its list.
    ///
    /// # Errors
    ///
    /// Stops at the first [`EntryRejection`], leaving that input in place.
    pub fn add_pending(&mut self) -> Result<(), EntryRejection> {
        for kind in self.pending_entries() {
            self.add_entry(kind)?;
        }
        Ok(())
    }

    /// Remove `value` from the list for `kind`.
    pub fn remove_entry(&mut self, kind: EntryKind, value: &str) -> bool {
        self.list_mut(kind).remove(value)
    }

    /// Fill the SKU field with a fresh random SKU.
    pub fn regenerate_sku<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.fields.sku = generate_sku(rng);
    }

    /// Validate and normalize the draft into a backend payload.
    ///
    /// A blank full description becomes the description, a blank stock
    /// quantity becomes 0 and a blank SKU is generated.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`ProductFormError`].
    pub fn prepare<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NewProduct, ProductFormError> {
        let fields = &self.fields;
        let name = fields.name.trim();
        let description = fields.description.trim();

        if name.is_empty() || description.is_empty() || fields.price.trim().is_empty() {
            return Err(ProductFormError::MissingRequired);
        }

        let price = Price::parse(&fields.price).map_err(ProductFormError::InvalidPrice)?;

        let stock = fields.stock_quantity.trim();
        let stock_quantity = if stock.is_empty() {
            0
        } else {
            stock
                .parse::<u32>()
                .map_err(|_| ProductFormError::InvalidStock)?
        };

        if self.images.is_empty() {
            return Err(ProductFormError::MissingImage);
        }

        let category = match fields.category.trim() {
            "" => None,
            label => Some(Category::from_label(label).map_err(|_| ProductFormError::InvalidCategory)?),
        };

        let full_description = match fields.full_description.trim() {
            "" => description.to_owned(),
            full => full.to_owned(),
        };

        let sku = match fields.sku.trim() {
            "" => generate_sku(rng),
            sku => sku.to_owned(),
        };

        Ok(NewProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            full_description,
            category,
            brand: fields.brand.trim().to_owned(),
            stock_quantity,
            sku,
            tags: self.tags.items().to_vec(),
            features: self.features.items().to_vec(),
            images: self.images.items().to_vec(),
        })
    }
}

/// A random SKU such as `SKU-7F3K9QX2A`.
#[must_use]
pub fn generate_sku<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut sku = String::with_capacity(SKU_PREFIX.len() + SKU_LEN);
    sku.push_str(SKU_PREFIX);
    for _ in 0..SKU_LEN {
        let idx = rng.random_range(0..SKU_ALPHABET.len());
        sku.push(char::from(SKU_ALPHABET[idx]));
    }
    sku
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn is_sku(value: &str) -> bool {
        value.strip_prefix("SKU-").is_some_and(|rest| {
            rest.len() == 9
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        })
    }

    fn valid_draft() -> ProductDraft {
        let mut draft = ProductDraft::default();
        draft.update_fields(ProductFields {
            name: "Desk Lamp".to_string(),
            description: "Warm LED lamp".to_string(),
            price: "39.50".to_string(),
            image_input: "https://img.example/lamp.jpg".to_string(),
            ..ProductFields::default()
        });
        draft.add_entry(EntryKind::Image).unwrap();
        draft
    }

    #[test]
    fn test_generated_sku_shape() {
        let mut rng = rng();
        for _ in 0..50 {
            assert!(is_sku(&generate_sku(&mut rng)));
        }
    }

    #[test]
    fn test_blank_optional_fields_normalize() {
        let product = valid_draft().prepare(&mut rng()).unwrap();

        assert_eq!(product.stock_quantity, 0);
        assert_eq!(product.full_description, "Warm LED lamp");
        assert!(is_sku(&product.sku));
        assert_eq!(product.category, None);
        assert_eq!(product.images, ["https://img.example/lamp.jpg"]);
    }

    #[test]
    fn test_explicit_fields_are_kept() {
        let mut draft = valid_draft();
        draft.fields.full_description = "A longer story".to_string();
        draft.fields.stock_quantity = " 12 ".to_string();
        draft.fields.sku = "LAMP-1".to_string();
        draft.fields.category = "Home & Garden".to_string();

        let product = draft.prepare(&mut rng()).unwrap();
        assert_eq!(product.full_description, "A longer story");
        assert_eq!(product.stock_quantity, 12);
        assert_eq!(product.sku, "LAMP-1");
        assert_eq!(product.category, Some(Category::HomeAndGarden));
    }

    #[test]
    fn test_missing_required_fields() {
        let mut draft = valid_draft();
        draft.fields.description = "   ".to_string();
        assert_eq!(
            draft.prepare(&mut rng()),
            Err(ProductFormError::MissingRequired)
        );
    }

    #[test]
    fn test_zero_and_negative_prices_rejected() {
        for price in ["0", "-5", "abc"] {
            let mut draft = valid_draft();
            draft.fields.price = price.to_string();
            let err = draft.prepare(&mut rng()).unwrap_err();
            assert!(matches!(err, ProductFormError::InvalidPrice(_)), "{price}");
            assert_eq!(err.to_string(), "Please enter a valid price");
        }
    }

    #[test]
    fn test_invalid_stock_rejected() {
        for stock in ["-1", "2.5", "lots"] {
            let mut draft = valid_draft();
            draft.fields.stock_quantity = stock.to_string();
            assert_eq!(
                draft.prepare(&mut rng()),
                Err(ProductFormError::InvalidStock),
                "{stock}"
            );
        }
    }

    #[test]
    fn test_images_required() {
        let mut draft = valid_draft();
        draft.remove_entry(EntryKind::Image, "https://img.example/lamp.jpg");
        assert_eq!(
            draft.prepare(&mut rng()),
            Err(ProductFormError::MissingImage)
        );
    }

    #[test]
    fn test_price_checked_before_images() {
        let mut draft = ProductDraft::default();
        draft.fields.name = "Lamp".to_string();
        draft.fields.description = "Lamp".to_string();
        draft.fields.price = "0".to_string();
        assert!(matches!(
            draft.prepare(&mut rng()),
            Err(ProductFormError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut draft = valid_draft();
        draft.fields.category = "Weapons".to_string();
        assert_eq!(
            draft.prepare(&mut rng()),
            Err(ProductFormError::InvalidCategory)
        );
    }

    #[test]
    fn test_add_entry_clears_buffer_only_on_success() {
        let mut draft = valid_draft();
        assert!(draft.fields.image_input.is_empty());

        draft.fields.image_input = "https://img.example/lamp.jpg".to_string();
        assert_eq!(
            draft.add_entry(EntryKind::Image),
            Err(EntryRejection::Duplicate(EntryKind::Image))
        );
        assert_eq!(draft.fields.image_input, "https://img.example/lamp.jpg");

        draft.fields.tag_input = "Lighting".to_string();
        draft.add_entry(EntryKind::Tag).unwrap();
        assert!(draft.fields.tag_input.is_empty());
        assert_eq!(draft.tags.items(), ["lighting"]);
    }

    #[test]
    fn test_pending_entries_are_added() {
        let mut draft = valid_draft();
        assert!(draft.pending_entries().is_empty());

        draft.fields.tag_input = " Lighting ".to_string();
        draft.fields.feature_input = "Dimmable".to_string();
        draft.fields.image_input = "   ".to_string();
        assert_eq!(draft.pending_entries(), [EntryKind::Tag, EntryKind::Feature]);

        draft.add_pending().unwrap();
        assert_eq!(draft.tags.items(), ["lighting"]);
        assert_eq!(draft.features.items(), ["Dimmable"]);
        assert!(draft.pending_entries().is_empty());
    }

    #[test]
    fn test_pending_duplicate_stops_and_keeps_input() {
        let mut draft = valid_draft();
        draft.fields.image_input = "https://img.example/lamp.jpg".to_string();

        assert_eq!(
            draft.add_pending(),
            Err(EntryRejection::Duplicate(EntryKind::Image))
        );
        assert_eq!(draft.fields.image_input, "https://img.example/lamp.jpg");
        assert_eq!(draft.images.len(), 1);
    }

    #[test]
    fn test_regenerate_sku() {
        let mut draft = ProductDraft::default();
        draft.regenerate_sku(&mut rng());
        assert!(is_sku(&draft.fields.sku));
    }
}
