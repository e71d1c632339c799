//! Catalog tables: products, categories with subcategories, brands and
//! genders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{BrandId, CategoryId, GenderId, ProductId};
use tracing::instrument;

use crate::api::types::{Category, Product, Subcategory};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::{
    ChildRow, NamedRow, finish_delete, list_or_flash, name_index, parent_name,
};
use crate::routes::{Flash, MessageQuery, or_dash, or_empty};
use crate::state::AppState;

// =============================================================================
// Products
// =============================================================================

/// Row of the product table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub store: String,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.product_id.to_string(),
            name: product.name().to_string(),
            price: product.price.unwrap_or_default().display(),
            store: or_dash(product.store_name.as_deref()),
        }
    }
}

/// Products page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub username: String,
    pub flash: Flash,
    pub products: Vec<ProductRowView>,
}

/// All products.
#[instrument(skip(state, user, messages))]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    let mut flash = Flash::from(messages);
    let products = list_or_flash(
        user.admin(&state).get_products().await,
        &mut flash,
        "Failed to load products.",
    )?;

    Ok(ProductsTemplate {
        username: user.username,
        flash,
        products: products.iter().map(ProductRowView::from).collect(),
    })
}

/// Delete a product.
#[instrument(skip(state, user))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Response {
    let result = user.admin(&state).delete_product(id).await;
    finish_delete(result, "/admin/products", "product").into_response()
}

// =============================================================================
// Categories
// =============================================================================

/// Categories page with the subcategory table below.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub username: String,
    pub flash: Flash,
    pub categories: Vec<NamedRow>,
    pub subcategories: Vec<ChildRow>,
}

/// Subcategory rows labelled with their parent category.
#[must_use]
pub fn subcategory_rows(categories: &[Category], subcategories: &[Subcategory]) -> Vec<ChildRow> {
    let names = name_index(categories, |c| c.category_id, |c| c.category_name.as_deref());
    subcategories
        .iter()
        .map(|s| ChildRow {
            id: s.sub_category_id.to_string(),
            name: s.sub_category_name.clone().unwrap_or_default(),
            parent: parent_name(&names, s.category_id),
        })
        .collect()
}

/// Categories and subcategories. Either list may fail on its own.
#[instrument(skip(state, user, messages))]
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<CategoriesTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.admin(&state);
    let (categories, subcategories) =
        tokio::join!(service.get_categories(), service.get_subcategories());

    let categories = list_or_flash(categories, &mut flash, "Failed to load categories.")?;
    let subcategories = or_empty(subcategories, "subcategories");

    Ok(CategoriesTemplate {
        username: user.username,
        flash,
        subcategories: subcategory_rows(&categories, &subcategories),
        categories: categories
            .iter()
            .map(|c| NamedRow::new(c.category_id, c.category_name.as_deref()))
            .collect(),
    })
}

/// Delete a category.
#[instrument(skip(state, user))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Response {
    let result = user.admin(&state).delete_category(id).await;
    finish_delete(result, "/admin/categories", "category").into_response()
}

// =============================================================================
// Brands and genders
// =============================================================================

/// Single `id | name` table with delete buttons.
#[derive(Template, WebTemplate)]
#[template(path = "admin/named_list.html")]
pub struct NamedListTemplate {
    pub username: String,
    pub flash: Flash,
    /// Page heading, also the active sidebar entry.
    pub title: &'static str,
    /// Header of the name column.
    pub name_header: &'static str,
    /// Prefix of each row's delete action.
    pub base_path: &'static str,
    pub rows: Vec<NamedRow>,
}

/// All brands.
#[instrument(skip(state, user, messages))]
pub async fn brands(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<NamedListTemplate> {
    let mut flash = Flash::from(messages);
    let brands = list_or_flash(
        user.admin(&state).get_brands().await,
        &mut flash,
        "Failed to load brands.",
    )?;

    Ok(NamedListTemplate {
        username: user.username,
        flash,
        title: "Brands",
        name_header: "Name",
        base_path: "/admin/brands",
        rows: brands
            .iter()
            .map(|b| NamedRow::new(b.brand_id, b.brand_name.as_deref()))
            .collect(),
    })
}

/// Delete a brand.
#[instrument(skip(state, user))]
pub async fn delete_brand(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<BrandId>,
) -> Response {
    let result = user.admin(&state).delete_brand(id).await;
    finish_delete(result, "/admin/brands", "brand").into_response()
}

/// All genders.
#[instrument(skip(state, user, messages))]
pub async fn genders(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<NamedListTemplate> {
    let mut flash = Flash::from(messages);
    let genders = list_or_flash(
        user.admin(&state).get_genders().await,
        &mut flash,
        "Failed to load genders.",
    )?;

    Ok(NamedListTemplate {
        username: user.username,
        flash,
        title: "Genders",
        name_header: "Type",
        base_path: "/admin/genders",
        rows: genders
            .iter()
            .map(|g| NamedRow::new(g.gender_id, g.gender_name.as_deref()))
            .collect(),
    })
}

/// Delete a gender.
#[instrument(skip(state, user))]
pub async fn delete_gender(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<GenderId>,
) -> Response {
    let result = user.admin(&state).delete_gender(id).await;
    finish_delete(result, "/admin/genders", "gender").into_response()
}
