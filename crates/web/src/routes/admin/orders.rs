//! Every order on the platform.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::api::types::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::list_or_flash;
use crate::routes::customer::orders::sort_newest_first;
use crate::routes::{Flash, MessageQuery, format_date};
use crate::state::AppState;

/// Row of the order table.
#[derive(Debug, Clone)]
pub struct AdminOrderView {
    pub id: String,
    pub user_id: String,
    pub total: String,
    pub status: String,
    pub status_class: &'static str,
    pub date: String,
    pub shipment: String,
}

impl From<&Order> for AdminOrderView {
    fn from(order: &Order) -> Self {
        let status = order.status();
        Self {
            id: order.order_id.to_string(),
            user_id: order
                .user_id
                .map_or_else(|| "N/A".to_string(), |id| id.to_string()),
            total: order.total().display(),
            status_class: status.badge_class(),
            status: status.to_string(),
            date: format_date(order.placed_at()),
            shipment: order
                .shipment_id
                .map_or_else(|| "N/A".to_string(), |id| id.to_string()),
        }
    }
}

/// Orders page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub flash: Flash,
    pub orders: Vec<AdminOrderView>,
}

/// All orders, newest first.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let mut flash = Flash::from(messages);
    let mut orders = list_or_flash(
        user.admin(&state).get_all_orders().await,
        &mut flash,
        "Failed to load orders. Please try again.",
    )?;
    sort_newest_first(&mut orders);

    Ok(OrdersTemplate {
        username: user.username,
        flash,
        orders: orders.iter().map(AdminOrderView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_row() {
        let order: Order = serde_json::from_str(
            r#"{"orderId":3,"userId":7,"orderDate":"2025-01-09T08:00:00","totalAmount":99.9,"orderStatus":"Returned","shipmentId":4}"#,
        )
        .unwrap();
        let row = AdminOrderView::from(&order);
        assert_eq!(row.user_id, "7");
        assert_eq!(row.total, "$99.90");
        assert_eq!(row.status, "Returned");
        assert_eq!(row.shipment, "4");
        assert_eq!(row.date, "January 9, 2025");
    }
}
