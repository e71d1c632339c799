//! Shipment control: delivery OTPs and status changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use quitq_core::{OrderId, OrderStatus, ShipmentId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::Shipment;
use crate::api::{AdminService, ApiError};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::list_or_flash;
use crate::routes::{
    Flash, MessageQuery, OptionView, SESSION_EXPIRED, StatusForm, finish_write, non_empty,
    parse_opt, redirect_error, redirect_success, status_options,
};
use crate::state::AppState;

const SHIPPERS_PATH: &str = "/admin/shippers";

/// Form of the OTP validation row.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipperOtpForm {
    pub otp: String,
    pub order_id: Option<String>,
}

/// One shipment card.
#[derive(Debug, Clone)]
pub struct ShipmentView {
    pub id: String,
    pub order_id: String,
    pub status: String,
    pub status_class: &'static str,
    pub status_options: Vec<OptionView>,
}

impl From<&Shipment> for ShipmentView {
    fn from(shipment: &Shipment) -> Self {
        let status = shipment.order_status.clone();
        Self {
            id: shipment.shipper_id.to_string(),
            order_id: shipment
                .order_id
                .map_or_else(String::new, |id| id.to_string()),
            status: status.as_ref().map_or_else(|| "N/A".to_string(), ToString::to_string),
            status_class: status
                .as_ref()
                .map_or("status-unknown", OrderStatus::badge_class),
            // Nothing is preselected; the admin picks the new status.
            status_options: status_options(
                OrderStatus::ADMIN_CHOICES,
                &OrderStatus::Other(String::new()),
            ),
        }
    }
}

/// Shippers page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/shippers.html")]
pub struct ShippersTemplate {
    pub username: String,
    pub flash: Flash,
    pub shipments: Vec<ShipmentView>,
}

/// Every shipment with its actions.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<ShippersTemplate> {
    let mut flash = Flash::from(messages);
    let shipments = list_or_flash(
        user.admin(&state).get_shippers().await,
        &mut flash,
        "Failed to load shipper data.",
    )?;

    Ok(ShippersTemplate {
        username: user.username,
        flash,
        shipments: shipments.iter().map(ShipmentView::from).collect(),
    })
}

/// Send the customer a delivery OTP for this shipment.
#[instrument(skip(state, user))]
pub async fn generate_otp(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<ShipmentId>,
) -> Response {
    let result = user.admin(&state).generate_shipper_otp(id).await;
    let success = format!("OTP generation initiated for Shipper ID {id}. (OTP sent to customer)");
    finish_write(
        result,
        SHIPPERS_PATH,
        Some(&success),
        "Failed to generate OTP. Please ensure the shipment is valid.",
    )
    .into_response()
}

/// Redirect describing an OTP check.
///
/// The backend's `false` is a wrong code, not a failed request.
pub fn otp_outcome(result: std::result::Result<bool, ApiError>, id: ShipmentId) -> Redirect {
    match result {
        Ok(true) => {
            add_breadcrumb("shipment", "Delivery OTP validated", None);
            redirect_success(SHIPPERS_PATH, &format!("OTP for Shipper ID {id} is valid!"))
        }
        Ok(false) => redirect_error(SHIPPERS_PATH, &format!("OTP for Shipper ID {id} is invalid.")),
        Err(e) if e.is_unauthorized() => redirect_error("/login", SESSION_EXPIRED),
        Err(e) => {
            tracing::warn!(error = %e, shipper_id = %id, "OTP validation failed");
            redirect_error(
                SHIPPERS_PATH,
                "Failed to validate OTP. Check the entered OTP and try again.",
            )
        }
    }
}

/// Check the OTP the customer read out.
#[instrument(skip(state, user, form))]
pub async fn validate_otp(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<ShipmentId>,
    Form(form): Form<ShipperOtpForm>,
) -> Response {
    let Some(otp) = non_empty(&form.otp) else {
        return redirect_error(SHIPPERS_PATH, "Please enter OTP to validate.").into_response();
    };
    let Some(order_id) = parse_opt::<OrderId>(form.order_id.as_deref()) else {
        return redirect_error(SHIPPERS_PATH, "This shipment has no order.").into_response();
    };

    let result = user
        .admin(&state)
        .validate_shipper_otp(id, otp, order_id)
        .await;
    otp_outcome(result, id).into_response()
}

/// Send a status change to the endpoint that owns it: delivery outcomes go
/// through the shipment, everything else through the order.
///
/// # Errors
///
/// Returns an error if the request fails or the backend rejects it.
pub async fn apply_status(
    service: &AdminService,
    ship_id: ShipmentId,
    order_id: OrderId,
    status: OrderStatus,
) -> std::result::Result<(), ApiError> {
    if status.is_delivery_outcome() {
        service.update_delivery_status(ship_id, order_id, status).await
    } else {
        service.update_order_status(order_id, status).await
    }
}

/// Change the status of the shipment's order.
#[instrument(skip(state, user))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<ShipmentId>,
    Form(form): Form<StatusForm>,
) -> Response {
    let Some(status) = form.chosen(OrderStatus::ADMIN_CHOICES) else {
        return redirect_error(SHIPPERS_PATH, "Please select a status to update.").into_response();
    };
    let Some(order_id) = parse_opt::<OrderId>(form.order_id.as_deref()) else {
        return redirect_error(SHIPPERS_PATH, "This shipment has no order.").into_response();
    };

    let success = format!("Order ID {order_id} status updated to '{status}' successfully!");
    let result = apply_status(&user.admin(&state), id, order_id, status).await;
    finish_write(
        result,
        SHIPPERS_PATH,
        Some(&success),
        "Failed to update status. Please try again.",
    )
    .into_response()
}
