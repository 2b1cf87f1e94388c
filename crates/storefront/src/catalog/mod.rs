//! Catalog view state: listing search/sort and product detail helpers.

pub mod detail;
pub mod list;

pub use detail::{Quantity, Wishlist, share_url};
pub use list::{SortOrder, filter_and_sort};
