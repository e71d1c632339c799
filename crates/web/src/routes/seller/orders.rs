//! Seller order management: status changes and delivery OTPs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use quitq_core::{OrderId, OrderStatus, ShipmentId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::{Order, UpdateOrderRequest, ValidateOtpRequest};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireSeller;
use crate::routes::customer::orders::sort_newest_first;
use crate::routes::seller::across_stores;
use crate::routes::{
    Flash, MessageQuery, OptionView, StatusForm, finish_write, format_date, load_failure,
    non_empty, parse_opt, redirect_error, status_options,
};
use crate::state::AppState;

const ORDERS_PATH: &str = "/seller-dashboard/orders";
const NO_USER_ID: &str = "Could not find your user ID. Please log in again.";

/// Form of the "Get OTP" button.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOtpForm {
    pub shipment_id: Option<String>,
}

/// Form of the OTP validation dialog.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOtpForm {
    pub otp: String,
}

/// Order row.
#[derive(Debug, Clone)]
pub struct SellerOrderView {
    pub id: String,
    pub date: String,
    pub shipment_id: String,
    pub has_shipment: bool,
    pub total: String,
    pub status: String,
    pub status_class: &'static str,
    pub status_options: Vec<OptionView>,
}

impl From<&Order> for SellerOrderView {
    fn from(order: &Order) -> Self {
        let status = order.status();
        Self {
            id: order.order_id.to_string(),
            date: format_date(order.placed_at()),
            shipment_id: order
                .shipment_id
                .map_or_else(|| "N/A".to_string(), |id| id.to_string()),
            has_shipment: order.shipment_id.is_some(),
            total: order.total().display(),
            status_class: status.badge_class(),
            status_options: status_options(OrderStatus::SELLER_CHOICES, &status),
            status: status.to_string(),
        }
    }
}

/// Orders page.
#[derive(Template, WebTemplate)]
#[template(path = "seller/orders.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub flash: Flash,
    pub orders: Vec<SellerOrderView>,
}

/// Orders across the seller's stores.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Query(messages): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.seller(&state);

    let mut orders = match user.user_id {
        None => {
            flash.error = Some(NO_USER_ID.to_string());
            Vec::new()
        }
        Some(user_id) => {
            match across_stores(&service, user_id, |id| service.get_orders_by_store(id)).await {
                Ok((_, orders)) => orders,
                Err(e) => {
                    flash = flash.or_error(
                        load_failure(e, "Failed to fetch orders. An API endpoint may be missing.")?
                            .error,
                    );
                    Vec::new()
                }
            }
        }
    };
    sort_newest_first(&mut orders);

    Ok(OrdersTemplate {
        username: user.username,
        flash,
        orders: orders.iter().map(SellerOrderView::from).collect(),
    })
}

/// Change an order's status.
#[instrument(skip(state, user))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(order_id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Response {
    let Some(order_status) = form.chosen(OrderStatus::SELLER_CHOICES) else {
        return redirect_error(ORDERS_PATH, "Please select a status to update.").into_response();
    };

    let result = user
        .seller(&state)
        .update_order(&UpdateOrderRequest {
            order_id,
            order_status,
        })
        .await;
    finish_write(
        result,
        ORDERS_PATH,
        Some("Order status updated!"),
        "Failed to update order status.",
    )
    .into_response()
}

/// Ask the backend to send the customer a delivery OTP.
///
/// An order without a shipment is reported without calling the backend.
#[instrument(skip(state, user))]
pub async fn generate_otp(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(order_id): Path<OrderId>,
    Form(form): Form<GenerateOtpForm>,
) -> Response {
    let Some(ship_id) = parse_opt::<ShipmentId>(form.shipment_id.as_deref()) else {
        return redirect_error(ORDERS_PATH, "Shipment ID not found for this order.")
            .into_response();
    };

    let result = user.seller(&state).generate_otp(ship_id).await;
    let success = format!("OTP generated for Shipment #{ship_id}.");
    finish_write(result, ORDERS_PATH, Some(&success), "Failed to generate OTP.").into_response()
}

/// Check the OTP the customer read out and complete delivery.
#[instrument(skip(state, user, form))]
pub async fn validate_otp(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(order_id): Path<OrderId>,
    Form(form): Form<ValidateOtpForm>,
) -> Response {
    let Some(otp) = non_empty(&form.otp) else {
        return redirect_error(ORDERS_PATH, "Please enter the OTP.").into_response();
    };
    let Some(user_id) = user.user_id else {
        return redirect_error(ORDERS_PATH, NO_USER_ID).into_response();
    };

    // The seller acts as the shipper here.
    let request = ValidateOtpRequest {
        shipper_id: user_id.as_i32(),
        otp: otp.to_string(),
        order_id,
    };
    let result = user.seller(&state).validate_otp(&request).await;
    if result.is_ok() {
        add_breadcrumb("order", "Delivery OTP validated", None);
    }
    finish_write(
        result,
        ORDERS_PATH,
        Some("OTP Validated! Order marked as Delivered."),
        "OTP validation failed.",
    )
    .into_response()
}
