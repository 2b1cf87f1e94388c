//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use momos_mart_core::ProductId;

use crate::backend::{PLACEHOLDER_IMAGE, ProductRecord};
use crate::catalog::{Quantity, SortOrder, Wishlist, filter_and_sort, share_url};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{Chrome, Page};
use crate::models::Flash;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub long_description: String,
    pub price: String,
    pub image: String,
    pub images: Vec<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub stock_quantity: Option<u32>,
    pub tags: Vec<String>,
    pub features: Vec<String>,
}

impl From<&ProductRecord> for ProductView {
    fn from(product: &ProductRecord) -> Self {
        let non_blank = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            long_description: product.long_description().to_string(),
            price: product.price.display(),
            image: product
                .main_image()
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
            images: product.all_images().into_iter().map(String::from).collect(),
            category: non_blank(&product.category),
            brand: non_blank(&product.brand),
            sku: non_blank(&product.sku),
            stock_quantity: product.stock_quantity,
            tags: product.tags.clone(),
            features: product.features.clone(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Detail query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Kept as text so a malformed value falls back to 1 instead of a 400.
    pub quantity: Option<String>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub quantity: Option<String>,
}

/// Sort menu entry.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductView>,
    pub search: String,
    pub sort_options: Vec<SortOption>,
    pub from_fallback: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub chrome: Chrome,
    pub product: ProductView,
    pub quantity: u32,
    pub decrement: u32,
    pub increment: u32,
    pub wishlisted: bool,
    pub share_url: String,
    pub from_fallback: bool,
}

fn parse_quantity(raw: Option<&str>) -> Quantity {
    Quantity::new(raw.and_then(|q| q.trim().parse().ok()))
}

/// Display product listing page.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let fetched = state.backend().list_products().await?;
    let order = SortOrder::from_param(query.sort.as_deref());
    let search = query.search.unwrap_or_default();

    let products = filter_and_sort(&fetched.value, search.trim(), order)
        .iter()
        .map(ProductView::from)
        .collect();

    let sort_options = SortOrder::ALL
        .into_iter()
        .map(|o| SortOption {
            value: o.as_param(),
            label: o.label(),
            selected: o == order,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        chrome: page.chrome().await?,
        products,
        search,
        sort_options,
        from_fallback: fetched.is_fallback(),
    }
    .into_response())
}

/// Display product detail page.
///
/// An unknown product sends the visitor back to the listing with a notice.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let Ok(fetched) = state.backend().get_product(&id).await else {
        page.flash(Flash::error("Product not found")).await?;
        return Ok(Redirect::to("/products").into_response());
    };

    let quantity = parse_quantity(query.quantity.as_deref());
    let wishlist = Wishlist::load(page.session()).await?;

    Ok(ProductShowTemplate {
        chrome: page.chrome().await?,
        product: ProductView::from(&fetched.value),
        quantity: quantity.get(),
        decrement: quantity.decrement().get(),
        increment: quantity.increment().get(),
        wishlisted: wishlist.contains(&id),
        share_url: share_url(&state.config().base_url, &id),
        from_fallback: fetched.is_fallback(),
    }
    .into_response())
}

/// Toggle a product in the visitor's wishlist.
#[instrument(skip(page))]
pub async fn toggle_wishlist(page: Page, Path(id): Path<String>) -> Result<Redirect> {
    let id = ProductId::new(id);
    let mut wishlist = Wishlist::load(page.session()).await?;
    let added = wishlist.toggle(&id);
    wishlist.save(page.session()).await?;

    add_breadcrumb("catalog", "Toggled wishlist", Some(&[("product_id", id.as_str())]));
    let message = if added {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    page.flash(Flash::success(message)).await?;

    Ok(Redirect::to(&product_path(&id)))
}

/// Acknowledge an add-to-cart click. No cart is kept.
#[instrument(skip(state, page))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
    Form(form): Form<CartForm>,
) -> Result<Redirect> {
    let id = ProductId::new(id);
    let Ok(fetched) = state.backend().get_product(&id).await else {
        page.flash(Flash::error("Product not found")).await?;
        return Ok(Redirect::to("/products"));
    };

    let quantity = parse_quantity(form.quantity.as_deref()).get();
    page.flash(Flash::success(format!(
        "Added {quantity} {} to cart!",
        fetched.value.name
    )))
    .await?;

    Ok(Redirect::to(&format!(
        "{}?quantity={quantity}",
        product_path(&id)
    )))
}

fn product_path(id: &ProductId) -> String {
    format!("/products/{}", urlencoding::encode(id.as_str()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::fallback::sample_products;

    #[test]
    fn test_view_uses_placeholder_without_images() {
        let mut product = sample_products().remove(0);
        product.images.clear();
        let view = ProductView::from(&product);
        assert_eq!(view.image, PLACEHOLDER_IMAGE);
        assert!(view.images.is_empty());
    }

    #[test]
    fn test_view_formats_price() {
        let view = ProductView::from(&sample_products()[2]);
        assert_eq!(view.price, "$49.99");
        assert_eq!(view.id, "3");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(None).get(), 1);
        assert_eq!(parse_quantity(Some("4")).get(), 4);
        assert_eq!(parse_quantity(Some("0")).get(), 1);
        assert_eq!(parse_quantity(Some("lots")).get(), 1);
    }
}
