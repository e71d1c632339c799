//! Seller product listings and the create/edit product form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{BrandId, CategoryId, ProductId, StoreId, SubcategoryId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{Brand, Category, Product, ProductUpload, Store, Subcategory};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireSeller;
use crate::models::CurrentUser;
use crate::routes::seller::{across_stores, store_name};
use crate::routes::upload::UploadForm;
use crate::routes::{
    Flash, MessageQuery, OptionView, finish_write, load_failure, or_empty, parse_opt, redirect_error,
};
use crate::state::AppState;

const PRODUCTS_PATH: &str = "/seller-dashboard/products";
const NO_SELLER_ID: &str = "Could not find your seller ID. Please log in again.";
const PRODUCTS_FAILED: &str =
    "Failed to fetch product data. An API endpoint may be missing or the server may be down.";

/// Multipart field carrying the product image.
pub const IMAGE_FIELD: &str = "productImageFile";

/// Parse the product form into the upload forwarded to the backend.
///
/// # Errors
///
/// Returns the message to show when a field is missing or malformed.
pub fn product_upload(mut form: UploadForm) -> std::result::Result<ProductUpload, String> {
    let product_name = form.required("productName", "Product name")?.to_string();

    let price: Decimal = form.parsed("price", "Price")?;
    if price.is_sign_negative() {
        return Err("Price cannot be negative.".to_string());
    }
    let quantity: i32 = form.parsed("quantity", "Stock quantity")?;
    if quantity < 0 {
        return Err("Stock quantity cannot be negative.".to_string());
    }

    Ok(ProductUpload {
        product_name,
        price: form.required("price", "Price")?.to_string(),
        quantity: quantity.to_string(),
        category_id: form.parsed::<CategoryId>("categoryId", "Category")?,
        sub_category_id: form.parsed_opt::<SubcategoryId>("subCategoryId", "Subcategory")?,
        brand_id: form.parsed::<BrandId>("brandId", "Brand")?,
        store_id: form.parsed::<StoreId>("storeId", "Store")?,
        image: form.file.take(),
    })
}

// =============================================================================
// Views
// =============================================================================

/// Product row.
#[derive(Debug, Clone)]
pub struct SellerProductView {
    pub id: String,
    pub name: String,
    pub store: String,
    pub brand: String,
    pub price: String,
    pub quantity: i32,
    pub image_url: String,
}

/// Values of the product form.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    pub product_name: String,
    pub price: String,
    pub quantity: String,
}

/// Products page.
#[derive(Template, WebTemplate)]
#[template(path = "seller/products.html")]
pub struct ProductsTemplate {
    pub username: String,
    pub flash: Flash,
    pub products: Vec<SellerProductView>,
    pub stores: Vec<OptionView>,
    pub categories: Vec<OptionView>,
    pub brands: Vec<OptionView>,
    pub subcategories: Vec<OptionView>,
    pub form: ProductFormView,
    pub form_action: String,
    pub editing: bool,
}

/// `<option>` list for the subcategory select.
#[derive(Template, WebTemplate)]
#[template(path = "partials/subcategory_options.html")]
pub struct SubcategoryOptionsTemplate {
    pub options: Vec<OptionView>,
}

fn store_options(stores: &[Store], selected: Option<StoreId>) -> Vec<OptionView> {
    stores
        .iter()
        .map(|s| {
            OptionView::new(
                s.store_id,
                s.store_name.as_deref().unwrap_or("Unnamed store"),
                Some(s.store_id) == selected,
            )
        })
        .collect()
}

fn category_options(categories: &[Category], selected: Option<CategoryId>) -> Vec<OptionView> {
    categories
        .iter()
        .map(|c| {
            OptionView::new(
                c.category_id,
                c.category_name.as_deref().unwrap_or("Unnamed"),
                Some(c.category_id) == selected,
            )
        })
        .collect()
}

fn brand_options(brands: &[Brand], selected: Option<BrandId>) -> Vec<OptionView> {
    brands
        .iter()
        .map(|b| {
            OptionView::new(
                b.brand_id,
                b.brand_name.as_deref().unwrap_or("Unnamed"),
                Some(b.brand_id) == selected,
            )
        })
        .collect()
}

fn subcategory_option_list(
    subcategories: &[Subcategory],
    selected: Option<SubcategoryId>,
) -> Vec<OptionView> {
    subcategories
        .iter()
        .map(|s| {
            OptionView::new(
                s.sub_category_id,
                s.sub_category_name.as_deref().unwrap_or("Unnamed"),
                Some(s.sub_category_id) == selected,
            )
        })
        .collect()
}

/// Everything the products page shows.
#[derive(Default)]
struct ProductPageData {
    stores: Vec<Store>,
    products: Vec<Product>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
}

async fn render(
    state: &AppState,
    user: CurrentUser,
    mut flash: Flash,
    editing: Option<ProductId>,
) -> Result<ProductsTemplate> {
    let service = user.seller(state);

    let data = match user.user_id {
        None => {
            flash.error = Some(NO_SELLER_ID.to_string());
            None
        }
        Some(user_id) => {
            let loaded = tokio::try_join!(
                across_stores(&service, user_id, |id| service.get_products_by_store(id)),
                service.get_categories(),
                service.get_brands(),
            );
            match loaded {
                Ok(((stores, products), categories, brands)) => Some(ProductPageData {
                    stores,
                    products,
                    categories,
                    brands,
                }),
                Err(e) => {
                    flash = flash.or_error(load_failure(e, PRODUCTS_FAILED)?.error);
                    None
                }
            }
        }
    };
    let data = data.unwrap_or_default();

    let editing_product = match editing {
        Some(id) => Some(
            data.products
                .iter()
                .find(|p| p.product_id == id)
                .ok_or_else(|| AppError::NotFound(format!("product {id}")))?,
        ),
        None => None,
    };

    let subcategories = match editing_product.and_then(|p| p.category_id) {
        Some(category_id) => or_empty(
            service.get_subcategories_by_category_id(category_id).await,
            "subcategories",
        ),
        None => Vec::new(),
    };

    let (form, form_action) = editing_product.map_or_else(
        || (ProductFormView::default(), PRODUCTS_PATH.to_string()),
        |p| {
            (
                ProductFormView {
                    product_name: p.product_name.clone().unwrap_or_default(),
                    price: p.price.map(|price| price.amount().to_string()).unwrap_or_default(),
                    quantity: p.quantity.map(|q| q.to_string()).unwrap_or_default(),
                },
                format!("{PRODUCTS_PATH}/{}", p.product_id),
            )
        },
    );

    let products = data
        .products
        .iter()
        .map(|p| SellerProductView {
            id: p.product_id.to_string(),
            name: p.name().to_string(),
            store: store_name(&data.stores, p.store_id),
            brand: p
                .brand_id
                .and_then(|id| data.brands.iter().find(|b| b.brand_id == id))
                .and_then(|b| b.brand_name.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            price: p.price.map_or_else(|| "-".to_string(), |price| price.display()),
            quantity: p.quantity.unwrap_or(0),
            image_url: state.image_url(p.product_image.as_deref()),
        })
        .collect();

    Ok(ProductsTemplate {
        username: user.username,
        flash,
        products,
        stores: store_options(&data.stores, editing_product.and_then(|p| p.store_id)),
        categories: category_options(
            &data.categories,
            editing_product.and_then(|p| p.category_id),
        ),
        brands: brand_options(&data.brands, editing_product.and_then(|p| p.brand_id)),
        subcategories: subcategory_option_list(
            &subcategories,
            editing_product.and_then(|p| p.sub_category_id),
        ),
        form,
        form_action,
        editing: editing_product.is_some(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Product list with an empty create form.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    render(&state, user, Flash::from(messages), None).await
}

/// Product list with the form prefilled from one product.
#[instrument(skip(state, user, messages))]
pub async fn edit(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<ProductId>,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    render(&state, user, Flash::from(messages), Some(id)).await
}

/// Create a product from the multipart form.
#[instrument(skip(state, user, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    multipart: Multipart,
) -> Response {
    let upload = match UploadForm::read(multipart, IMAGE_FIELD)
        .await
        .and_then(product_upload)
    {
        Ok(upload) => upload,
        Err(message) => return redirect_error(PRODUCTS_PATH, &message).into_response(),
    };

    let result = user.seller(&state).create_product(upload).await;
    finish_write(
        result,
        PRODUCTS_PATH,
        Some("Product created successfully!"),
        "Failed to save product.",
    )
    .into_response()
}

/// Update a product from the multipart form.
#[instrument(skip(state, user, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Response {
    let upload = match UploadForm::read(multipart, IMAGE_FIELD)
        .await
        .and_then(product_upload)
    {
        Ok(upload) => upload,
        Err(message) => {
            return redirect_error(&format!("{PRODUCTS_PATH}/{id}/edit"), &message)
                .into_response();
        }
    };

    let result = user.seller(&state).update_product(id, upload).await;
    finish_write(
        result,
        PRODUCTS_PATH,
        Some("Product updated successfully!"),
        "Failed to save product.",
    )
    .into_response()
}

async fn load_subcategory_options(
    state: &AppState,
    user: &CurrentUser,
    category_id: CategoryId,
) -> SubcategoryOptionsTemplate {
    let subcategories = or_empty(
        user.seller(state)
            .get_subcategories_by_category_id(category_id)
            .await,
        "subcategories",
    );
    SubcategoryOptionsTemplate {
        options: subcategory_option_list(&subcategories, None),
    }
}

/// Subcategory options for a category.
#[instrument(skip(state, user))]
pub async fn subcategory_options(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(category_id): Path<CategoryId>,
) -> SubcategoryOptionsTemplate {
    load_subcategory_options(&state, &user, category_id).await
}

/// Query string of the category `<select>` when it fires HTMX on change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryQuery {
    pub category_id: Option<String>,
}

/// Subcategory options for `?categoryId=`. A blank category yields no
/// options.
#[instrument(skip(state, user))]
pub async fn subcategory_options_query(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Query(query): Query<SubcategoryQuery>,
) -> SubcategoryOptionsTemplate {
    match parse_opt::<CategoryId>(query.category_id.as_deref()) {
        Some(category_id) => load_subcategory_options(&state, &user, category_id).await,
        None => SubcategoryOptionsTemplate {
            options: Vec::new(),
        },
    }
}
