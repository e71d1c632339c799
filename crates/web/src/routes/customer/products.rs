//! Product grid and product detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use quitq_core::{BrandId, CategoryId, Price, ProductId, SubcategoryId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{Product, ProductFilter};
use crate::api::{ApiError, CustomerService};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::routes::customer::ProductCardView;
use crate::routes::{Flash, MessageQuery, OptionView, load_failure, non_empty, or_dash, or_empty, parse_opt};
use crate::state::AppState;

const PRODUCTS_FAILED: &str = "Failed to fetch products. Please try again later.";

/// Grid query string: `?search=`, the filter form fields, or
/// `?subcategoryId=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub subcategory_id: Option<String>,
}

/// Which endpoint supplies the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSource {
    Search(String),
    Filter(ProductFilter),
    Subcategory(SubcategoryId),
    All,
}

impl ProductSource {
    /// Pick the source for a query. Search wins over the filter form, which
    /// wins over a subcategory link.
    #[must_use]
    pub fn from_query(query: &ProductQuery) -> Self {
        if let Some(term) = query.search.as_deref().and_then(non_empty) {
            return Self::Search(term.to_string());
        }

        let filter = ProductFilter {
            category_id: parse_opt::<i32>(query.category_id.as_deref()).map(CategoryId::new),
            brand_id: parse_opt::<i32>(query.brand_id.as_deref()).map(BrandId::new),
            min_price: parse_opt::<Decimal>(query.min_price.as_deref()).map(Price::new),
            max_price: parse_opt::<Decimal>(query.max_price.as_deref()).map(Price::new),
        };
        if !filter.is_empty() {
            return Self::Filter(filter);
        }

        parse_opt::<i32>(query.subcategory_id.as_deref())
            .map_or(Self::All, |id| Self::Subcategory(SubcategoryId::new(id)))
    }

    async fn load(&self, service: &CustomerService) -> std::result::Result<Vec<Product>, ApiError> {
        match self {
            Self::Search(term) => service.search_products(term).await,
            Self::Filter(filter) => service.filter_products(filter).await,
            Self::Subcategory(id) => service.get_products_by_subcategory(*id).await,
            Self::All => service.get_products().await,
        }
    }

    /// Heading above the grid.
    #[must_use]
    pub fn heading(&self) -> String {
        match self {
            Self::Search(term) => format!("Results for \"{term}\""),
            Self::Filter(_) => "Filtered products".to_string(),
            Self::Subcategory(_) => "Products in this subcategory".to_string(),
            Self::All => "All products".to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product grid page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/products.html")]
pub struct ProductsTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub heading: String,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<OptionView>,
    pub brands: Vec<OptionView>,
    pub min_price: String,
    pub max_price: String,
    pub return_to: String,
}

/// Product detail page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/product_detail.html")]
pub struct ProductDetailTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub product: ProductDetailView,
    pub return_to: String,
}

/// Product fields shown on the detail page.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub in_stock: bool,
    pub store_name: String,
    pub image_url: String,
}

impl ProductDetailView {
    fn new(product: &Product, state: &AppState) -> Self {
        Self {
            id: product.product_id.to_string(),
            name: product.name().to_string(),
            description: or_dash(product.product_description.as_deref()),
            price: product.price.map_or_else(|| "-".to_string(), |p| p.display()),
            quantity: product.quantity.unwrap_or(0).to_string(),
            in_stock: product.in_stock(),
            store_name: or_dash(product.store_name.as_deref()),
            image_url: state.image_url(product.product_image.as_deref()),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Product grid.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(query): Query<ProductQuery>,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    let service = user.customer(&state);
    let source = ProductSource::from_query(&query);

    let (products, categories, brands) = tokio::join!(
        source.load(&service),
        service.get_categories(),
        service.get_brands()
    );

    let mut flash = Flash::from(messages);
    let products = match products {
        Ok(products) => products,
        Err(e) => {
            flash = flash.or_error(load_failure(e, PRODUCTS_FAILED)?.error);
            Vec::new()
        }
    };

    let selected_category = parse_opt::<i32>(query.category_id.as_deref());
    let selected_brand = parse_opt::<i32>(query.brand_id.as_deref());

    Ok(ProductsTemplate {
        username: user.username,
        flash,
        search: query.search.unwrap_or_default(),
        heading: source.heading(),
        products: products
            .iter()
            .map(|p| ProductCardView::new(p, &state))
            .collect(),
        categories: or_empty(categories, "categories")
            .iter()
            .map(|c| {
                let id = c.category_id.as_i32();
                OptionView::new(
                    id,
                    c.category_name.as_deref().unwrap_or("Unnamed"),
                    Some(id) == selected_category,
                )
            })
            .collect(),
        brands: or_empty(brands, "brands")
            .iter()
            .map(|b| {
                let id = b.brand_id.as_i32();
                OptionView::new(
                    id,
                    b.brand_name.as_deref().unwrap_or("Unnamed"),
                    Some(id) == selected_brand,
                )
            })
            .collect(),
        min_price: query.min_price.unwrap_or_default(),
        max_price: query.max_price.unwrap_or_default(),
        return_to: super::CUSTOMER_HOME.to_string(),
    })
}

/// Product detail.
#[instrument(skip(state, user, messages))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<ProductId>,
    Query(messages): Query<MessageQuery>,
) -> Result<ProductDetailTemplate> {
    let product = user.customer(&state).get_product_by_id(id).await?;

    Ok(ProductDetailTemplate {
        username: user.username,
        flash: Flash::from(messages),
        search: String::new(),
        product: ProductDetailView::new(&product, &state),
        return_to: format!("/customer/products/{id}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProductQuery {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "search" => query.search = value,
                "categoryId" => query.category_id = value,
                "brandId" => query.brand_id = value,
                "minPrice" => query.min_price = value,
                "maxPrice" => query.max_price = value,
                "subcategoryId" => query.subcategory_id = value,
                other => panic!("unexpected key {other}"),
            }
        }
        query
    }

    #[test]
    fn test_search_wins() {
        let source = ProductSource::from_query(&query(&[("search", "mug"), ("categoryId", "2")]));
        assert_eq!(source, ProductSource::Search("mug".to_string()));
    }

    #[test]
    fn test_filter_over_subcategory() {
        let source = ProductSource::from_query(&query(&[
            ("categoryId", "2"),
            ("maxPrice", "49.50"),
            ("subcategoryId", "9"),
        ]));
        assert_eq!(
            source,
            ProductSource::Filter(ProductFilter {
                category_id: Some(CategoryId::new(2)),
                max_price: Some(Price::from_cents(4950)),
                ..ProductFilter::default()
            })
        );
    }

    #[test]
    fn test_subcategory_and_fallback() {
        assert_eq!(
            ProductSource::from_query(&query(&[("subcategoryId", "9"), ("search", " ")])),
            ProductSource::Subcategory(SubcategoryId::new(9))
        );
        assert_eq!(
            ProductSource::from_query(&query(&[("categoryId", ""), ("brandId", "x")])),
            ProductSource::All
        );
    }
}
