//! Product categories offered by the creation form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a label does not name a known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product category: {0}")]
pub struct CategoryError(pub String);

/// One of the fixed product categories.
///
/// Serialized using the human-readable label (e.g. `"Home & Garden"`),
/// which is also what the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Clothing")]
    Clothing,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    #[serde(rename = "Sports & Outdoors")]
    SportsAndOutdoors,
    #[serde(rename = "Books")]
    Books,
    #[serde(rename = "Toys & Games")]
    ToysAndGames,
    #[serde(rename = "Health & Beauty")]
    HealthAndBeauty,
    #[serde(rename = "Automotive")]
    Automotive,
    #[serde(rename = "Food & Beverages")]
    FoodAndBeverages,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 10] = [
        Self::Electronics,
        Self::Clothing,
        Self::HomeAndGarden,
        Self::SportsAndOutdoors,
        Self::Books,
        Self::ToysAndGames,
        Self::HealthAndBeauty,
        Self::Automotive,
        Self::FoodAndBeverages,
        Self::OfficeSupplies,
    ];

    /// The display label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::HomeAndGarden => "Home & Garden",
            Self::SportsAndOutdoors => "Sports & Outdoors",
            Self::Books => "Books",
            Self::ToysAndGames => "Toys & Games",
            Self::HealthAndBeauty => "Health & Beauty",
            Self::Automotive => "Automotive",
            Self::FoodAndBeverages => "Food & Beverages",
            Self::OfficeSupplies => "Office Supplies",
        }
    }

    /// Look up a category by its exact label.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError`] if the label is not one of the ten categories.
    pub fn from_label(label: &str) -> Result<Self, CategoryError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| CategoryError(label.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_lookup() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()).unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(
            Category::from_label("Weapons"),
            Err(CategoryError("Weapons".to_string()))
        );
        assert!(Category::from_label("electronics").is_err());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Category::HomeAndGarden).unwrap();
        assert_eq!(json, "\"Home & Garden\"");
        let parsed: Category = serde_json::from_str("\"Office Supplies\"").unwrap();
        assert_eq!(parsed, Category::OfficeSupplies);
    }
}
