//! Customer pages: catalog, cart, wishlist, orders and account.

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

use serde::Deserialize;

use crate::api::types::Product;
use crate::state::AppState;

/// Landing page of the customer tree.
pub const CUSTOMER_HOME: &str = "/customer";

/// Form field naming where to return after a cart or wishlist action.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnTo {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Path to redirect to after an action posted from `return_to`.
///
/// Only paths inside the customer tree are honored so that a crafted form
/// cannot bounce the user to another site.
#[must_use]
pub fn safe_return_path(return_to: Option<&str>, fallback: &str) -> String {
    match return_to.map(str::trim) {
        Some(path)
            if (path == CUSTOMER_HOME || path.starts_with("/customer/")
                || path.starts_with("/customer?"))
                && !path.contains("//")
                && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Product tile shown in grids and the wishlist.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
}

impl ProductCardView {
    pub fn new(product: &Product, state: &AppState) -> Self {
        Self {
            id: product.product_id.to_string(),
            name: product.name().to_string(),
            price: product.price.map_or_else(|| "-".to_string(), |p| p.display()),
            image_url: state.image_url(product.product_image.as_deref()),
            in_stock: product.in_stock(),
        }
    }
}
