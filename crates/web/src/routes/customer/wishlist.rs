//! Wishlist page and wishlist actions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use quitq_core::{Price, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::CustomerService;
use crate::api::types::{AddToCartRequest, WishlistItem, WishlistRequest};
use crate::error::Result;
use crate::filters;
use crate::middleware::{AuthRejection, RequireCustomer};
use crate::routes::customer::cart::{CART_UPDATED, ToastTemplate};
use crate::routes::customer::{ReturnTo, safe_return_path};
use crate::routes::{Flash, MessageQuery, finish_write, is_htmx, load_failure, redirect_error};
use crate::state::AppState;

const WISHLIST_PATH: &str = "/customer/wishlist";
const WISHLIST_FAILED: &str = "Failed to fetch wishlist. Please try again later.";

/// Add-to-wishlist form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Saved product as shown on the wishlist page.
#[derive(Debug, Clone)]
pub struct WishlistItemView {
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl WishlistItemView {
    /// `None` for an entry that names no product, which cannot be acted on.
    fn new(item: &WishlistItem, state: &AppState) -> Option<Self> {
        let product_id = item.product_id()?;
        let product = item.product.as_ref();
        Some(Self {
            product_id: product_id.to_string(),
            name: product.map_or("Unnamed product", |p| p.name()).to_string(),
            price: product
                .and_then(|p| p.price)
                .unwrap_or(Price::ZERO)
                .display(),
            image_url: state.image_url(product.and_then(|p| p.product_image.as_deref())),
        })
    }
}

/// Wishlist page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/wishlist.html")]
pub struct WishlistTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub items: Vec<WishlistItemView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Wishlist page.
#[instrument(skip(state, user, messages))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(messages): Query<MessageQuery>,
) -> Result<WishlistTemplate> {
    let mut flash = Flash::from(messages);
    let items = match user.customer(&state).get_wishlist().await {
        Ok(items) => items,
        Err(e) => {
            flash = flash.or_error(load_failure(e, WISHLIST_FAILED)?.error);
            Vec::new()
        }
    };

    Ok(WishlistTemplate {
        username: user.username,
        flash,
        search: String::new(),
        items: items
            .iter()
            .filter_map(|i| WishlistItemView::new(i, &state))
            .collect(),
    })
}

/// Save a product for the signed-in user.
#[instrument(skip(state, user, headers))]
pub async fn add(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    headers: HeaderMap,
    Form(form): Form<AddToWishlistForm>,
) -> Response {
    let back = safe_return_path(form.return_to.as_deref(), super::CUSTOMER_HOME);
    let Some(user_id) = user.user_id else {
        return redirect_error(&back, "Please log in to use your wishlist.").into_response();
    };

    let result = user
        .customer(&state)
        .add_to_wishlist(WishlistRequest {
            user_id,
            product_id: form.product_id,
        })
        .await;

    if is_htmx(&headers) {
        let (message, is_error) = match &result {
            Ok(()) => ("Product added to wishlist!", false),
            Err(e) if e.is_unauthorized() => return AuthRejection::Unauthorized.into_response(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to add to wishlist");
                ("Failed to add to wishlist.", true)
            }
        };
        return ToastTemplate {
            message: message.to_string(),
            is_error,
        }
        .into_response();
    }

    finish_write(
        result,
        &back,
        Some("Product added to wishlist!"),
        "Failed to add to wishlist.",
    )
    .into_response()
}

/// Remove a product from the wishlist.
#[instrument(skip(state, user, form))]
pub async fn delete(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(product_id): Path<ProductId>,
    Form(form): Form<ReturnTo>,
) -> Response {
    let back = safe_return_path(form.return_to.as_deref(), WISHLIST_PATH);
    let result = user.customer(&state).delete_wishlist_item(product_id).await;
    finish_write(result, &back, None, "Failed to remove from wishlist.").into_response()
}

/// Add a saved product to the cart, then drop it from the wishlist.
///
/// The wishlist entry is kept when the cart call fails.
pub async fn move_product_to_cart(service: &CustomerService, product_id: ProductId) -> Redirect {
    let added = service
        .add_to_cart(AddToCartRequest {
            product_id,
            quantity: 1,
        })
        .await;
    if let Err(e) = added {
        return finish_write(Err(e), WISHLIST_PATH, None, "Failed to add to cart.");
    }

    let removed = service.delete_wishlist_item(product_id).await;
    finish_write(
        removed,
        WISHLIST_PATH,
        Some("Product added to cart!"),
        "Added to cart, but failed to remove from wishlist.",
    )
}

/// Move a saved product into the cart.
#[instrument(skip(state, user))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(product_id): Path<ProductId>,
) -> Response {
    let redirect = move_product_to_cart(&user.customer(&state), product_id).await;
    (AppendHeaders([("HX-Trigger", CART_UPDATED)]), redirect).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::LOCATION;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::services::test_support::authorized_client;

    fn state() -> AppState {
        AppState::for_tests("http://backend.test/")
    }

    #[test]
    fn test_view_reads_nested_product() {
        let item: WishlistItem = serde_json::from_str(
            r#"{"wishListId":3,"product":{"productId":8,"productName":"Lamp","price":12.5,"productImage":"/images/lamp.png"}}"#,
        )
        .unwrap();
        let view = WishlistItemView::new(&item, &state()).unwrap();
        assert_eq!(view.product_id, "8");
        assert_eq!(view.name, "Lamp");
        assert_eq!(view.price, "$12.50");
        assert_eq!(view.image_url, "http://backend.test/images/lamp.png");
    }

    #[test]
    fn test_view_skips_entry_without_product() {
        let item: WishlistItem = serde_json::from_str(r#"{"wishListId":3}"#).unwrap();
        assert!(WishlistItemView::new(&item, &state()).is_none());
    }

    fn location(redirect: Redirect) -> String {
        redirect.into_response().headers()[LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_move_to_cart_removes_after_add() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .and(body_json(json!({"productId": 8, "quantity": 1})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/wishlist/8"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let service = CustomerService::new(authorized_client(&server));
        let redirect = move_product_to_cart(&service, ProductId::new(8)).await;
        assert_eq!(
            location(redirect),
            "/customer/wishlist?success=Product%20added%20to%20cart%21"
        );
    }

    #[tokio::test]
    async fn test_move_to_cart_keeps_entry_when_add_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/wishlist/8"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let service = CustomerService::new(authorized_client(&server));
        let redirect = move_product_to_cart(&service, ProductId::new(8)).await;
        assert_eq!(
            location(redirect),
            "/customer/wishlist?error=Failed%20to%20add%20to%20cart."
        );
    }
}
