//! Product listing: search and sort.

use std::cmp::Ordering;

use crate::backend::ProductRecord;

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Alphabetical by name, ignoring case.
    #[default]
    Name,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl SortOrder {
    /// All orders, in the order the sort menu lists them.
    pub const ALL: [Self; 3] = [Self::Name, Self::PriceLow, Self::PriceHigh];

    /// Parse a query-string value. Unknown or missing values sort by name.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-low") => Self::PriceLow,
            Some("price-high") => Self::PriceHigh,
            _ => Self::Name,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
        }
    }

    /// Label shown in the sort menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Sort by Name",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
        }
    }

    fn compare(self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match self {
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
        }
    }
}

/// Keep products whose name or description contains `search` (ignoring
/// case), then sort them by `order`.
///
/// An empty search term keeps everything. The sort is stable, so products
/// that compare equal keep their backend order.
#[must_use]
pub fn filter_and_sort(
    products: &[ProductRecord],
    search: &str,
    order: SortOrder,
) -> Vec<ProductRecord> {
    let needle = search.to_lowercase();

    let mut matches: Vec<ProductRecord> = products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    matches.sort_by(|a, b| order.compare(a, b));
    matches
}
