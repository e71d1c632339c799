//! Cart, wishlist, orders and shipments.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quitq_core::{
    CartItemId, OrderId, OrderItemId, OrderStatus, Price, ProductId, ShipmentId, UserId,
    WishlistItemId,
};
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::{null_as_default, string_or_number};

// =============================================================================
// Cart
// =============================================================================

/// One line of the signed-in user's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_id: CartItemId,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub product_price: Option<Price>,
    pub product_image: Option<String>,
    #[serde(default)]
    pub quantity: i32,
}

impl CartItem {
    /// Unit price times quantity. A missing price counts as zero.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product_price.unwrap_or(Price::ZERO).times(self.quantity)
    }
}

/// Body of `POST /api/cart/add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Body of `POST /api/checkout/place-order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: UserId,
    pub payment_method: &'static str,
}

impl PlaceOrderRequest {
    /// Cash on delivery, the only payment method the storefront offers.
    pub const CASH_ON_DELIVERY: &'static str = "COD";

    #[must_use]
    pub const fn cash_on_delivery(user_id: UserId) -> Self {
        Self {
            user_id,
            payment_method: Self::CASH_ON_DELIVERY,
        }
    }
}

// =============================================================================
// Wishlist
// =============================================================================

/// A saved product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(alias = "wishListId")]
    pub wishlist_id: Option<WishlistItemId>,
    pub product_id: Option<ProductId>,
    pub product: Option<Product>,
}

impl WishlistItem {
    /// The product id, taken from the nested product when the item itself
    /// does not carry one.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
            .or_else(|| self.product.as_ref().map(|p| p.product_id))
    }
}

/// Body of `POST /api/wishlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as returned by the order endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: Option<UserId>,
    /// ISO-8601 timestamp, with or without offset.
    pub order_date: Option<String>,
    pub total_amount: Option<Price>,
    pub order_status: Option<OrderStatus>,
    pub shipment_id: Option<ShipmentId>,
    #[serde(
        rename = "orderItemListDTOs",
        default,
        deserialize_with = "null_as_default"
    )]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The order date parsed as a naive timestamp.
    ///
    /// Accepts RFC 3339 (converted to UTC), offset-less ISO timestamps with
    /// optional fractional seconds, and bare dates.
    #[must_use]
    pub fn placed_at(&self) -> Option<NaiveDateTime> {
        let raw = self.order_date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Status, defaulting to `Pending` when the backend omitted it.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.order_status.clone().unwrap_or_default()
    }

    /// Total, defaulting to zero.
    #[must_use]
    pub fn total(&self) -> Price {
        self.total_amount.unwrap_or(Price::ZERO)
    }
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_item_id: Option<OrderItemId>,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Price>,
    pub product: Option<Product>,
}

impl OrderItem {
    /// Product name from the line or its nested product.
    #[must_use]
    pub fn name(&self) -> &str {
        self.product_name
            .as_deref()
            .or_else(|| self.product.as_ref().and_then(|p| p.product_name.as_deref()))
            .unwrap_or("Unnamed product")
    }

    /// Unit price from the line or its nested product.
    #[must_use]
    pub fn unit_price(&self) -> Option<Price> {
        self.price
            .or_else(|| self.product.as_ref().and_then(|p| p.price))
    }

    /// Image path of the nested product.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.product.as_ref().and_then(|p| p.product_image.as_deref())
    }
}

// =============================================================================
// Shipments
// =============================================================================

/// A shipment record. The backend calls its id `shipperId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub shipper_id: ShipmentId,
    pub order_id: Option<OrderId>,
    #[serde(
        rename = "OTP",
        alias = "otp",
        default,
        deserialize_with = "string_or_number"
    )]
    pub otp: Option<String>,
    pub order_status: Option<OrderStatus>,
}

/// Body of `PUT /api/shipment/updateorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub order_id: OrderId,
    pub order_status: OrderStatus,
}

/// Body of `PUT /api/shipment/update-delivery-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusRequest {
    pub ship_id: ShipmentId,
    pub order_id: OrderId,
    pub order_status: OrderStatus,
}

/// Body of `POST /api/shipment/validateotp`.
///
/// `shipper_id` is the shipment id when an admin validates and the seller's
/// user id when a seller does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOtpRequest {
    pub shipper_id: i32,
    #[serde(rename = "OTP")]
    pub otp: String,
    pub order_id: OrderId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_line_total() {
        let item: CartItem = serde_json::from_str(
            r#"{"cartId":1,"productId":2,"productName":"Mug","productPrice":4.25,"quantity":3}"#,
        )
        .unwrap();
        assert_eq!(item.line_total(), Price::from_cents(1275));

        let item: CartItem = serde_json::from_str(r#"{"cartId":2,"quantity":3}"#).unwrap();
        assert_eq!(item.line_total(), Price::ZERO);
    }

    #[test]
    fn test_wishlist_accepts_both_id_spellings() {
        let item: WishlistItem = serde_json::from_str(
            r#"{"wishListId":3,"product":{"productId":8,"productName":"Lamp"}}"#,
        )
        .unwrap();
        assert_eq!(item.wishlist_id, Some(WishlistItemId::new(3)));
        assert_eq!(item.product_id(), Some(ProductId::new(8)));

        let item: WishlistItem =
            serde_json::from_str(r#"{"wishlistId":4,"productId":9}"#).unwrap();
        assert_eq!(item.wishlist_id, Some(WishlistItemId::new(4)));
        assert_eq!(item.product_id(), Some(ProductId::new(9)));
    }

    #[test]
    fn test_order_decodes_items_and_null_list() {
        let order: Order = serde_json::from_str(
            r#"{
                "orderId": 31,
                "orderDate": "2025-03-02T14:05:00",
                "totalAmount": 120.0,
                "orderStatus": "Shipped",
                "shipmentId": 6,
                "orderItemListDTOs": [
                    {"orderItemId": 1, "quantity": 2, "product": {"productId": 4, "productName": "Kettle", "price": 60}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name(), "Kettle");
        assert_eq!(order.items[0].unit_price(), Some(Price::from_cents(6000)));

        let order: Order =
            serde_json::from_str(r#"{"orderId":32,"orderItemListDTOs":null}"#).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_date_formats() {
        let with_offset: Order =
            serde_json::from_str(r#"{"orderId":1,"orderDate":"2025-03-02T14:05:00+05:30"}"#)
                .unwrap();
        assert_eq!(
            with_offset.placed_at().unwrap().to_string(),
            "2025-03-02 08:35:00"
        );

        let fractional: Order =
            serde_json::from_str(r#"{"orderId":2,"orderDate":"2025-03-02T14:05:00.1234567"}"#)
                .unwrap();
        assert!(fractional.placed_at().is_some());

        let bare: Order =
            serde_json::from_str(r#"{"orderId":3,"orderDate":"2025-03-02"}"#).unwrap();
        assert_eq!(bare.placed_at().unwrap().to_string(), "2025-03-02 00:00:00");

        let junk: Order =
            serde_json::from_str(r#"{"orderId":4,"orderDate":"yesterday"}"#).unwrap();
        assert!(junk.placed_at().is_none());
    }

    #[test]
    fn test_shipment_otp_string_or_number() {
        let shipment: Shipment =
            serde_json::from_str(r#"{"shipperId":5,"orderId":31,"OTP":"482913"}"#).unwrap();
        assert_eq!(shipment.otp.as_deref(), Some("482913"));

        let shipment: Shipment =
            serde_json::from_str(r#"{"shipperId":5,"OTP":482913}"#).unwrap();
        assert_eq!(shipment.otp.as_deref(), Some("482913"));

        let shipment: Shipment = serde_json::from_str(r#"{"shipperId":5}"#).unwrap();
        assert_eq!(shipment.otp, None);
    }

    #[test]
    fn test_validate_otp_request_field_names() {
        let request = ValidateOtpRequest {
            shipper_id: 5,
            otp: "482913".to_string(),
            order_id: OrderId::new(31),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"shipperId": 5, "OTP": "482913", "orderId": 31})
        );
    }
}
