//! Dashboard route handlers, including the add-product form.
//!
//! Every button on the add-product form posts the whole form plus an
//! `action`. The draft is refreshed from the posted fields, the action is
//! applied, and the visitor is redirected back (or shown the created
//! product).
//!
//! Pressing Enter posts the hidden default button's `enter` action. Text
//! typed into the image, tag or feature inputs is added to its list; with
//! nothing pending the form is submitted.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use momos_mart_core::Category;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{EntryKind, EntryList, ProductDraft, ProductFields};
use crate::middleware::{Chrome, Page, RequireAuth};
use crate::models::{CurrentUser, Flash, session_keys};
use crate::state::AppState;

const ADD_PRODUCT_PATH: &str = "/dashboard/add-product";

/// Seconds before the confirmation page moves on to the new product.
const CREATED_REDIRECT_SECONDS: u32 = 2;

/// Button pressed on the add-product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductAction {
    AddImage,
    RemoveImage,
    AddTag,
    RemoveTag,
    AddFeature,
    RemoveFeature,
    GenerateSku,
    Reset,
    Enter,
    Submit,
}

/// Add-product form data.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub action: ProductAction,
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// Query string set by each remove button's `formaction`.
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    /// Entry to remove.
    #[serde(default)]
    pub value: String,
}

/// An entry with the URL its remove button posts to.
pub struct EntryView {
    pub value: String,
    pub remove_url: String,
}

fn entry_views(list: &EntryList) -> Vec<EntryView> {
    list.items()
        .iter()
        .map(|value| EntryView {
            value: value.clone(),
            remove_url: format!("{ADD_PRODUCT_PATH}?value={}", urlencoding::encode(value)),
        })
        .collect()
}

/// Category menu entry.
pub struct CategoryOption {
    pub label: &'static str,
    pub selected: bool,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub chrome: Chrome,
    pub name: String,
}

/// Add-product page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/add_product.html")]
pub struct AddProductTemplate {
    pub chrome: Chrome,
    pub draft: ProductDraft,
    pub images: Vec<EntryView>,
    pub tags: Vec<EntryView>,
    pub features: Vec<EntryView>,
    pub categories: Vec<CategoryOption>,
    pub image_capacity: usize,
    pub tag_capacity: usize,
    pub feature_capacity: usize,
}

/// Confirmation shown after a product is created.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/product_created.html")]
pub struct ProductCreatedTemplate {
    pub chrome: Chrome,
    pub name: String,
    pub product_url: String,
    pub delay_seconds: u32,
}

/// Display the dashboard.
pub async fn index(RequireAuth(user): RequireAuth, page: Page) -> Result<Response> {
    Ok(DashboardTemplate {
        chrome: page.chrome().await?,
        name: user.name,
    }
    .into_response())
}

async fn load_draft(session: &Session) -> Result<ProductDraft> {
    Ok(session
        .get(session_keys::PRODUCT_DRAFT)
        .await?
        .unwrap_or_default())
}

async fn save_draft(session: &Session, draft: &ProductDraft) -> Result<()> {
    session.insert(session_keys::PRODUCT_DRAFT, draft).await?;
    Ok(())
}

/// Display the add-product form.
pub async fn add_product_page(_user: RequireAuth, page: Page) -> Result<Response> {
    let draft = load_draft(page.session()).await?;
    let categories = Category::ALL
        .into_iter()
        .map(|c| CategoryOption {
            label: c.label(),
            selected: draft.fields.category == c.label(),
        })
        .collect();

    Ok(AddProductTemplate {
        chrome: page.chrome().await?,
        images: entry_views(&draft.images),
        tags: entry_views(&draft.tags),
        features: entry_views(&draft.features),
        draft,
        categories,
        image_capacity: EntryKind::Image.capacity(),
        tag_capacity: EntryKind::Tag.capacity(),
        feature_capacity: EntryKind::Feature.capacity(),
    }
    .into_response())
}

/// Apply one add-product form action.
#[instrument(skip_all)]
pub async fn add_product_action(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: Page,
    Query(query): Query<EntryQuery>,
    Form(form): Form<AddProductForm>,
) -> Result<Response> {
    tracing::debug!(action = ?form.action, "Add-product action");
    let mut draft = load_draft(page.session()).await?;
    draft.update_fields(form.fields);

    let flash = match form.action {
        ProductAction::AddImage => add_entry(&mut draft, EntryKind::Image),
        ProductAction::AddTag => add_entry(&mut draft, EntryKind::Tag),
        ProductAction::AddFeature => add_entry(&mut draft, EntryKind::Feature),
        ProductAction::RemoveImage => remove_entry(&mut draft, EntryKind::Image, &query.value),
        ProductAction::RemoveTag => remove_entry(&mut draft, EntryKind::Tag, &query.value),
        ProductAction::RemoveFeature => {
            remove_entry(&mut draft, EntryKind::Feature, &query.value)
        }
        ProductAction::GenerateSku => {
            draft.regenerate_sku(&mut rand::rng());
            Flash::success("SKU generated")
        }
        ProductAction::Reset => {
            draft = ProductDraft::default();
            Flash::success("Form reset")
        }
        ProductAction::Enter => return enter(&state, &user, &page, draft).await,
        ProductAction::Submit => return submit(&state, &user, &page, draft).await,
    };

    save_draft(page.session(), &draft).await?;
    page.flash(flash).await?;
    Ok(Redirect::to(ADD_PRODUCT_PATH).into_response())
}

fn add_entry(draft: &mut ProductDraft, kind: EntryKind) -> Flash {
    match draft.add_entry(kind) {
        Ok(()) => Flash::success(kind.added_message()),
        Err(rejection) => Flash::error(rejection.to_string()),
    }
}

fn remove_entry(draft: &mut ProductDraft, kind: EntryKind, value: &str) -> Flash {
    draft.remove_entry(kind, value);
    Flash::success(kind.removed_message())
}

/// Add whatever is typed in the entry inputs, or submit when none are.
async fn enter(
    state: &AppState,
    user: &CurrentUser,
    page: &Page,
    mut draft: ProductDraft,
) -> Result<Response> {
    let pending = draft.pending_entries();
    if pending.is_empty() {
        return submit(state, user, page, draft).await;
    }

    for kind in pending {
        let flash = add_entry(&mut draft, kind);
        page.flash(flash).await?;
    }
    save_draft(page.session(), &draft).await?;
    Ok(Redirect::to(ADD_PRODUCT_PATH).into_response())
}

/// Validate, normalize and send the draft.
///
/// Entries still typed in their inputs are added first. On any failure the
/// draft is kept so the visitor can fix it.
async fn submit(
    state: &AppState,
    user: &CurrentUser,
    page: &Page,
    mut draft: ProductDraft,
) -> Result<Response> {
    if let Err(rejection) = draft.add_pending() {
        save_draft(page.session(), &draft).await?;
        page.flash(Flash::error(rejection.to_string())).await?;
        return Ok(Redirect::to(ADD_PRODUCT_PATH).into_response());
    }

    // Scoped so the thread-local RNG is not held across an await.
    let prepared = draft.prepare(&mut rand::rng());

    let product = match prepared {
        Ok(product) => product,
        Err(e) => {
            save_draft(page.session(), &draft).await?;
            page.flash(Flash::error(e.to_string())).await?;
            return Ok(Redirect::to(ADD_PRODUCT_PATH).into_response());
        }
    };

    let created = match state.backend().authenticated(Some(user)) {
        Ok(backend) => backend.create_product(&product).await,
        Err(e) => Err(e),
    };

    match created {
        Ok(record) => {
            tracing::info!(product_id = %record.id, name = %record.name, "Product created");
            add_breadcrumb(
                "dashboard",
                "Created product",
                Some(&[("product_id", record.id.as_str())]),
            );

            page.session()
                .remove::<ProductDraft>(session_keys::PRODUCT_DRAFT)
                .await?;
            page.flash(Flash::success("Product created successfully!"))
                .await?;

            Ok(ProductCreatedTemplate {
                chrome: page.chrome().await?,
                name: record.name,
                product_url: format!("/products/{}", urlencoding::encode(record.id.as_str())),
                delay_seconds: CREATED_REDIRECT_SECONDS,
            }
            .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product creation failed");
            save_draft(page.session(), &draft).await?;
            page.flash(Flash::error("Failed to create product. Please try again."))
                .await?;
            Ok(Redirect::to(ADD_PRODUCT_PATH).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_urls_are_encoded() {
        let mut images = EntryList::new(EntryKind::Image);
        images.try_add("https://img.example/a b.jpg?w=5").unwrap();

        let views = entry_views(&images);
        assert_eq!(
            views[0].remove_url,
            "/dashboard/add-product?value=https%3A%2F%2Fimg.example%2Fa%20b.jpg%3Fw%3D5"
        );
    }

    #[test]
    fn test_action_names() {
        let action: ProductAction = serde_json::from_str("\"remove-feature\"").unwrap();
        assert_eq!(action, ProductAction::RemoveFeature);
        let action: ProductAction = serde_json::from_str("\"generate-sku\"").unwrap();
        assert_eq!(action, ProductAction::GenerateSku);
        let action: ProductAction = serde_json::from_str("\"enter\"").unwrap();
        assert_eq!(action, ProductAction::Enter);
    }
}
