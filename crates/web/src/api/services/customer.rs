//! Storefront endpoints used by customers: catalog, cart, wishlist, orders
//! and addresses.

use quitq_core::{AddressId, CartItemId, OrderId, Price, ProductId, ShipmentId, SubcategoryId, UserId};
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{
    AddToCartRequest, Address, AddressPayload, Brand, CartItem, Category, Order,
    PlaceOrderRequest, Product, ProductFilter, Shipment, WishlistItem, WishlistRequest,
};
use crate::api::{ApiClient, ApiError};

/// Cart total as the backend reports it: a bare number or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CartTotal {
    Amount(Price),
    Wrapped {
        #[serde(alias = "totalCost", alias = "total", alias = "totalAmount")]
        amount: Price,
    },
}

/// Customer-facing endpoints.
#[derive(Debug, Clone)]
pub struct CustomerService {
    client: ApiClient,
}

impl CustomerService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_list("/api/products").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("/api/products/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_products_by_subcategory(
        &self,
        id: SubcategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        self.client
            .get_list(&format!("/api/products/bysubcategory/{id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn filter_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let products: Option<Vec<Product>> =
            self.client.post_json("/api/products/filter", filter).await?;
        Ok(products.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let products: Option<Vec<Product>> = self
            .client
            .get_with_query("/api/products/search", &[("query", query)])
            .await?;
        Ok(products.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get_list("/api/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.client.get_list("/api/brands").await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.client.get_list("/api/cart").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, request: AddToCartRequest) -> Result<(), ApiError> {
        self.client
            .send_json(Method::POST, "/api/cart/add", &request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn increase_quantity(&self, id: CartItemId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("/api/cart/increase-quantity/{id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn decrease_quantity(&self, id: CartItemId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("/api/cart/decrease-quantity/{id}"))
            .await
    }

    /// Server-computed cart total. `None` when the backend sent no amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_cart_total_cost(&self) -> Result<Option<Price>, ApiError> {
        let total: Option<CartTotal> = self.client.get("/api/cart/totalcost").await?;
        Ok(total.map(|t| match t {
            CartTotal::Amount(amount) | CartTotal::Wrapped { amount } => amount,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn delete_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
        self.client.delete(&format!("/api/cart/delete/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<(), ApiError> {
        self.client
            .send_json(Method::POST, "/api/checkout/place-order", &request)
            .await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        self.client.get_list("/api/wishlist").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, request: WishlistRequest) -> Result<(), ApiError> {
        self.client
            .send_json(Method::POST, "/api/wishlist", &request)
            .await
    }

    /// Remove a product from the wishlist. Keyed by product, not wishlist id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn delete_wishlist_item(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/api/wishlist/{product_id}"))
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        self.client
            .get_list(&format!("/api/order/all/{user_id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_shipment(&self, id: ShipmentId) -> Result<Shipment, ApiError> {
        self.client.get(&format!("/api/shipment/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_shipment_by_order_id(&self, order_id: OrderId) -> Result<Shipment, ApiError> {
        self.client
            .get(&format!("/api/shipment/by-order/{order_id}"))
            .await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_user_addresses(&self, user_id: UserId) -> Result<Vec<Address>, ApiError> {
        self.client
            .get_list(&format!("/api/user-addresses/user/{user_id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload))]
    pub async fn add_user_address(&self, payload: &AddressPayload) -> Result<(), ApiError> {
        self.client
            .send_json(Method::POST, "/api/user-addresses", payload)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload))]
    pub async fn update_user_address(
        &self,
        id: AddressId,
        payload: &AddressPayload,
    ) -> Result<(), ApiError> {
        self.client
            .send_json(Method::PUT, &format!("/api/user-addresses/{id}"), payload)
            .await
    }
}
