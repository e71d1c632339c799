//! Cart page, cart badge and cart actions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Response},
};
use quitq_core::{CartItemId, Price, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{AddToCartRequest, CartItem, PlaceOrderRequest};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{AuthRejection, RequireCustomer};
use crate::routes::customer::safe_return_path;
use crate::routes::{
    Flash, MessageQuery, finish_write, is_htmx, load_failure, parse_opt, redirect_error,
    redirect_success,
};
use crate::state::AppState;

const CART_PATH: &str = "/customer/cart";
const CART_FAILED: &str = "Failed to fetch cart. Please log in.";

/// Event HTMX listens for to refresh the cart badge.
pub const CART_UPDATED: &str = "cart-updated";

/// Add-to-cart form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

impl AddToCartForm {
    /// Quantity to add. A blank, unparsable or non-positive entry means one.
    #[must_use]
    pub fn quantity(&self) -> i32 {
        parse_opt::<i32>(self.quantity.as_deref())
            .filter(|q| *q > 0)
            .unwrap_or(1)
    }
}

// =============================================================================
// Views
// =============================================================================

/// One cart line as shown on the page.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
}

impl CartLineView {
    fn new(item: &CartItem, state: &AppState) -> Self {
        Self {
            id: item.cart_id.to_string(),
            product_id: item
                .product_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: item
                .product_name
                .clone()
                .unwrap_or_else(|| "Unnamed product".to_string()),
            image_url: state.image_url(item.product_image.as_deref()),
            unit_price: item.product_price.unwrap_or(Price::ZERO).display(),
            quantity: item.quantity,
            line_total: item.line_total().display(),
        }
    }
}

/// Cart total: the backend's figure when it gave one, otherwise the sum of
/// the lines.
#[must_use]
pub fn cart_total(reported: Option<Price>, items: &[CartItem]) -> Price {
    reported.unwrap_or_else(|| items.iter().map(CartItem::line_total).sum())
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/cart.html")]
pub struct CartTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub items: Vec<CartLineView>,
    pub total: String,
}

/// Cart badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Inline result of an HTMX action.
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub message: String,
    pub is_error: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart page.
#[instrument(skip(state, user, messages))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(messages): Query<MessageQuery>,
) -> Result<CartTemplate> {
    let service = user.customer(&state);
    let (items, total) = tokio::join!(service.get_cart(), service.get_cart_total_cost());

    let mut flash = Flash::from(messages);
    let items = match items {
        Ok(items) => items,
        Err(e) => {
            flash = flash.or_error(load_failure(e, CART_FAILED)?.error);
            Vec::new()
        }
    };

    let reported = total.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch cart total, summing lines");
        None
    });

    Ok(CartTemplate {
        username: user.username,
        flash,
        search: String::new(),
        total: cart_total(reported, &items).display(),
        items: items.iter().map(|i| CartLineView::new(i, &state)).collect(),
    })
}

/// Cart badge. A failure shows zero rather than breaking the header.
#[instrument(skip(state, user))]
pub async fn count(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
) -> CartCountTemplate {
    let count = match user.customer(&state).get_cart().await {
        Ok(items) => items.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch cart count");
            0
        }
    };
    CartCountTemplate { count }
}

/// Add one product to the cart.
///
/// HTMX requests get an inline message and the `cart-updated` trigger;
/// plain form posts are redirected back with a flash.
#[instrument(skip(state, user, headers))]
pub async fn add(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let request = AddToCartRequest {
        product_id: form.product_id,
        quantity: form.quantity(),
    };
    let result = user.customer(&state).add_to_cart(request).await;

    if is_htmx(&headers) {
        return match result {
            Ok(()) => (
                AppendHeaders([("HX-Trigger", CART_UPDATED)]),
                ToastTemplate {
                    message: "Product added to cart!".to_string(),
                    is_error: false,
                },
            )
                .into_response(),
            Err(e) if e.is_unauthorized() => AuthRejection::Unauthorized.into_response(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to add to cart");
                ToastTemplate {
                    message: "Failed to add to cart.".to_string(),
                    is_error: true,
                }
                .into_response()
            }
        };
    }

    let back = safe_return_path(form.return_to.as_deref(), super::CUSTOMER_HOME);
    finish_write(
        result,
        &back,
        Some("Product added to cart!"),
        "Failed to add to cart.",
    )
    .into_response()
}

/// Increase a line's quantity by one.
#[instrument(skip(state, user))]
pub async fn increase(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<CartItemId>,
) -> Response {
    let result = user.customer(&state).increase_quantity(id).await;
    finish_write(result, CART_PATH, None, "Failed to update quantity.").into_response()
}

/// Decrease a line's quantity by one.
#[instrument(skip(state, user))]
pub async fn decrease(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<CartItemId>,
) -> Response {
    let result = user.customer(&state).decrease_quantity(id).await;
    finish_write(result, CART_PATH, None, "Failed to update quantity.").into_response()
}

/// Remove a line.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<CartItemId>,
) -> Response {
    let result = user.customer(&state).delete_cart_item(id).await;
    finish_write(result, CART_PATH, None, "Failed to remove item.").into_response()
}

/// Place a cash-on-delivery order for the whole cart.
#[instrument(skip(state, user))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
) -> Response {
    let Some(user_id) = user.user_id else {
        return redirect_error(CART_PATH, "You must be logged in to place an order.")
            .into_response();
    };

    let result = user
        .customer(&state)
        .place_order(PlaceOrderRequest::cash_on_delivery(user_id))
        .await;
    if result.is_ok() {
        add_breadcrumb("order", "Order placed", None);
        return redirect_success("/customer/orders", "Order placed successfully!")
            .into_response();
    }
    finish_write(result, CART_PATH, None, "Failed to place order.").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(price: Option<i64>, quantity: i32) -> CartItem {
        CartItem {
            cart_id: CartItemId::new(1),
            product_id: Some(ProductId::new(2)),
            product_name: None,
            product_price: price.map(Price::from_cents),
            product_image: None,
            quantity,
        }
    }

    #[test]
    fn test_cart_total_prefers_backend_figure() {
        let items = [item(Some(1000), 2)];
        assert_eq!(
            cart_total(Some(Price::from_cents(1500)), &items),
            Price::from_cents(1500)
        );
    }

    #[test]
    fn test_cart_total_falls_back_to_lines() {
        let items = [item(Some(1000), 2), item(Some(250), 3), item(None, 4)];
        assert_eq!(cart_total(None, &items), Price::from_cents(2750));
        assert_eq!(cart_total(None, &[]), Price::ZERO);
    }

    #[test]
    fn test_add_quantity_defaults_to_one() {
        let form = |quantity: Option<&str>| AddToCartForm {
            product_id: ProductId::new(5),
            quantity: quantity.map(str::to_string),
            return_to: None,
        };
        assert_eq!(form(Some("")).quantity(), 1);
        assert_eq!(form(None).quantity(), 1);
        assert_eq!(form(Some("abc")).quantity(), 1);
        assert_eq!(form(Some("0")).quantity(), 1);
        assert_eq!(form(Some(" 3 ")).quantity(), 3);
    }
}
