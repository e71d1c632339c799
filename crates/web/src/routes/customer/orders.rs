//! Order history with delivery OTPs.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use futures::future::join_all;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::{Order, OrderItem, Shipment};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::routes::{Flash, MessageQuery, format_date, load_failure};
use crate::state::AppState;

const ORDERS_FAILED: &str = "Failed to fetch orders.";

/// One order line.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: i32,
    pub price: String,
    pub image_url: String,
}

impl OrderLineView {
    fn new(item: &OrderItem, state: &AppState) -> Self {
        Self {
            name: item.name().to_string(),
            quantity: item.quantity.unwrap_or(0),
            price: item
                .unit_price()
                .map_or_else(|| "-".to_string(), |p| p.display()),
            image_url: state.image_url(item.image()),
        }
    }
}

/// An order card.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub date: String,
    pub total: String,
    pub status: String,
    pub status_class: &'static str,
    pub otp: String,
    pub items: Vec<OrderLineView>,
}

/// Order history page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/orders.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub flash: Flash,
    pub search: String,
    pub orders: Vec<OrderView>,
}

/// Sort orders by date, newest first. Undated orders go last.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by_key(|o| std::cmp::Reverse(o.placed_at()));
}

/// OTP shown on an order card, or "N/A" when the shipment lookup failed or
/// carried no code.
#[must_use]
pub fn otp_label(shipment: &std::result::Result<Shipment, ApiError>) -> String {
    shipment
        .as_ref()
        .ok()
        .and_then(|s| s.otp.as_deref())
        .map(str::trim)
        .filter(|otp| !otp.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

/// Order history.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Query(messages): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.customer(&state);

    let mut orders = match user.user_id {
        None => {
            flash.error = Some("Please log in to view your orders.".to_string());
            Vec::new()
        }
        Some(user_id) => match service.get_orders(user_id).await {
            Ok(orders) => orders,
            Err(e) => {
                flash = flash.or_error(load_failure(e, ORDERS_FAILED)?.error);
                Vec::new()
            }
        },
    };
    sort_newest_first(&mut orders);

    let shipments = join_all(
        orders
            .iter()
            .map(|o| service.get_shipment_by_order_id(o.order_id)),
    )
    .await;

    let orders = orders
        .iter()
        .zip(&shipments)
        .map(|(order, shipment)| {
            if let Err(e) = shipment {
                tracing::debug!(order_id = %order.order_id, error = %e, "No shipment for order");
            }
            let status = order.status();
            OrderView {
                id: order.order_id.to_string(),
                date: format_date(order.placed_at()),
                total: order.total().display(),
                status: status.to_string(),
                status_class: status.badge_class(),
                otp: otp_label(shipment),
                items: order
                    .items
                    .iter()
                    .map(|i| OrderLineView::new(i, &state))
                    .collect(),
            }
        })
        .collect();

    Ok(OrdersTemplate {
        username: user.username,
        flash,
        search: String::new(),
        orders,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn order(json: &str) -> Order {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut orders = vec![
            order(r#"{"orderId":1,"orderDate":"2025-01-05T10:00:00"}"#),
            order(r#"{"orderId":2}"#),
            order(r#"{"orderId":3,"orderDate":"2025-03-01T08:00:00"}"#),
            order(r#"{"orderId":4,"orderDate":"2025-02-11"}"#),
        ];
        sort_newest_first(&mut orders);
        let ids: Vec<i32> = orders.iter().map(|o| o.order_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_otp_label() {
        let shipment: Shipment = serde_json::from_str(r#"{"shipperId":5,"OTP":482913}"#).unwrap();
        assert_eq!(otp_label(&Ok(shipment)), "482913");

        let blank: Shipment = serde_json::from_str(r#"{"shipperId":5,"OTP":" "}"#).unwrap();
        assert_eq!(otp_label(&Ok(blank)), "N/A");

        let missing = Err(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        });
        assert_eq!(otp_label(&missing), "N/A");
    }
}
