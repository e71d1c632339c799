//! HTTP route handlers for the web client.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (signed-in users go to their role home)
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Backend reachability check
//!
//! # Auth
//! GET  /login                    - Login page
//! POST /login                    - Login action
//! GET  /register                 - Registration page
//! POST /register                 - Registration action
//! GET  /resetpassword            - Password reset page
//! POST /resetpassword            - Password reset action
//! POST /logout                   - Logout action
//!
//! # Customer (role Customer)
//! GET  /customer                 - Product grid (search, filter, subcategory)
//! GET  /customer/products/{id}   - Product detail
//! GET  /customer/cart            - Cart page
//! GET  /customer/cart/count      - Cart count badge (HTMX fragment)
//! POST /customer/cart/add        - Add to cart (HX-Trigger: cart-updated)
//! POST /customer/cart/{id}/increase|decrease|delete
//! POST /customer/cart/place-order
//! GET  /customer/wishlist        - Wishlist page
//! POST /customer/wishlist/add
//! POST /customer/wishlist/{product_id}/delete|move-to-cart
//! GET  /customer/orders          - Order history with delivery OTPs
//! GET  /customer/account         - Address book
//! POST /customer/account/addresses
//! GET  /customer/account/addresses/{id}/edit
//! POST /customer/account/addresses/{id}
//!
//! # Seller (role Seller)
//! GET  /seller-dashboard                     - Store statistics
//! GET  /seller-dashboard/products            - Products across stores + form
//! POST /seller-dashboard/products            - Create product (multipart)
//! GET  /seller-dashboard/products/{id}/edit  - Edit form
//! POST /seller-dashboard/products/{id}       - Update product (multipart)
//! GET  /seller-dashboard/categories/{id}/subcategories - Options (HTMX fragment)
//! GET  /seller-dashboard/orders              - Orders across stores
//! POST /seller-dashboard/orders/{id}/status|otp|validate-otp
//!
//! # Admin (role Admin)
//! GET  /admin                    - Dashboard counts
//! GET  /admin/users[/{id}]       - Users (+ details panel)
//! GET  /admin/products | stores | categories | brands | genders | locations
//! POST /admin/{resource}/{id}/delete
//! POST /admin/stores             - Create store (multipart)
//! GET  /admin/orders             - All orders
//! GET  /admin/shippers           - Shipments
//! POST /admin/shippers/{id}/otp|validate-otp|status
//! ```

pub mod admin;
pub mod auth;
pub mod customer;
pub mod home;
pub mod seller;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
};
use chrono::NaiveDateTime;
use quitq_core::OrderStatus;
use serde::Deserialize;

use crate::api::ApiError;
use crate::error::AppError;
use crate::state::AppState;

/// Largest multipart body accepted for product and store uploads.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Shown on the login page when the backend rejects a session token.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/resetpassword",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route("/logout", post(auth::logout))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::products::index))
        .route("/products/{id}", get(customer::products::show))
        .route("/cart", get(customer::cart::show))
        .route("/cart/count", get(customer::cart::count))
        .route("/cart/add", post(customer::cart::add))
        .route("/cart/place-order", post(customer::cart::place_order))
        .route("/cart/{id}/increase", post(customer::cart::increase))
        .route("/cart/{id}/decrease", post(customer::cart::decrease))
        .route("/cart/{id}/delete", post(customer::cart::delete))
        .route("/wishlist", get(customer::wishlist::show))
        .route("/wishlist/add", post(customer::wishlist::add))
        .route("/wishlist/{product_id}/delete", post(customer::wishlist::delete))
        .route(
            "/wishlist/{product_id}/move-to-cart",
            post(customer::wishlist::move_to_cart),
        )
        .route("/orders", get(customer::orders::index))
        .route("/account", get(customer::account::index))
        .route("/account/addresses", post(customer::account::create_address))
        .route(
            "/account/addresses/{id}/edit",
            get(customer::account::edit_address),
        )
        .route("/account/addresses/{id}", post(customer::account::update_address))
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::dashboard::index))
        .route(
            "/products",
            get(seller::products::index).post(seller::products::create),
        )
        .route("/products/{id}/edit", get(seller::products::edit))
        .route("/products/{id}", post(seller::products::update))
        .route(
            "/categories/{id}/subcategories",
            get(seller::products::subcategory_options),
        )
        .route("/subcategories", get(seller::products::subcategory_options_query))
        .route("/orders", get(seller::orders::index))
        .route("/orders/{id}/status", post(seller::orders::update_status))
        .route("/orders/{id}/otp", post(seller::orders::generate_otp))
        .route("/orders/{id}/validate-otp", post(seller::orders::validate_otp))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard::index))
        .route("/users", get(admin::users::index))
        .route("/users/{id}", get(admin::users::show))
        .route("/users/{id}/delete", post(admin::users::delete))
        .route("/products", get(admin::catalog::products))
        .route("/products/{id}/delete", post(admin::catalog::delete_product))
        .route("/stores", get(admin::stores::index).post(admin::stores::create))
        .route("/stores/{id}/delete", post(admin::stores::delete))
        .route("/categories", get(admin::catalog::categories))
        .route("/categories/{id}/delete", post(admin::catalog::delete_category))
        .route("/brands", get(admin::catalog::brands))
        .route("/brands/{id}/delete", post(admin::catalog::delete_brand))
        .route("/genders", get(admin::catalog::genders))
        .route("/genders/{id}/delete", post(admin::catalog::delete_gender))
        .route("/locations", get(admin::locations::index))
        .route("/states/{id}/delete", post(admin::locations::delete_state))
        .route("/cities/{id}/delete", post(admin::locations::delete_city))
        .route("/orders", get(admin::orders::index))
        .route("/shippers", get(admin::shippers::index))
        .route("/shippers/{id}/otp", post(admin::shippers::generate_otp))
        .route("/shippers/{id}/validate-otp", post(admin::shippers::validate_otp))
        .route("/shippers/{id}/status", post(admin::shippers::update_status))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Create all routes for the web client.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .nest("/customer", customer_routes())
        .nest("/seller-dashboard", seller_routes())
        .nest("/admin", admin_routes())
}

// =============================================================================
// Flash Messages
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// One-shot message shown at the top of a page after a redirect.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Flash {
    /// A page that failed to load its main content.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            success: None,
        }
    }

    /// Keep the redirect's message unless a newer error replaces it.
    #[must_use]
    pub fn or_error(mut self, error: Option<String>) -> Self {
        if error.is_some() {
            self.error = error;
        }
        self
    }
}

impl From<MessageQuery> for Flash {
    fn from(query: MessageQuery) -> Self {
        Self {
            error: query.error.filter(|m| !m.trim().is_empty()),
            success: query.success.filter(|m| !m.trim().is_empty()),
        }
    }
}

/// Redirect to `path` carrying a flash message under `key`.
fn flash_redirect(path: &str, key: &str, message: &str) -> Redirect {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{separator}{key}={}",
        urlencoding::encode(message)
    ))
}

/// Redirect with a success flash.
#[must_use]
pub fn redirect_success(path: &str, message: &str) -> Redirect {
    flash_redirect(path, "success", message)
}

/// Redirect with an error flash.
#[must_use]
pub fn redirect_error(path: &str, message: &str) -> Redirect {
    flash_redirect(path, "error", message)
}

/// Redirect after a mutation: back to `back` with a flash describing the
/// outcome. A rejected token sends the user to sign in again.
pub fn finish_write(
    result: Result<(), ApiError>,
    back: &str,
    success: Option<&str>,
    failure: &str,
) -> Redirect {
    match result {
        Ok(()) => success.map_or_else(|| Redirect::to(back), |msg| redirect_success(back, msg)),
        Err(e) if e.is_unauthorized() => redirect_error("/login", SESSION_EXPIRED),
        Err(e) => {
            tracing::warn!(error = %e, "{failure}");
            redirect_error(back, &e.user_message(failure))
        }
    }
}

/// Turn a failed page load into the message shown instead of its content.
///
/// A rejected token becomes an `AppError` so the user is sent to sign in.
///
/// # Errors
///
/// Returns `AppError::Api` when the backend answered 401.
pub fn load_failure(err: ApiError, message: &str) -> Result<Flash, AppError> {
    if err.is_unauthorized() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "{message}");
    Ok(Flash::error(message))
}

/// Use a secondary list, degrading to empty when its call failed.
pub fn or_empty<T>(result: Result<Vec<T>, ApiError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch {what}");
        Vec::new()
    })
}

// =============================================================================
// View Helpers
// =============================================================================

/// Option in a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    pub fn new(value: impl ToString, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// Status `<select>` options with `current` preselected.
#[must_use]
pub fn status_options(choices: &[OrderStatus], current: &OrderStatus) -> Vec<OptionView> {
    choices
        .iter()
        .map(|s| OptionView::new(s, s.as_str(), s == current))
        .collect()
}

/// Posted status change.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusForm {
    pub order_status: String,
    pub order_id: Option<String>,
}

impl StatusForm {
    /// The selected status, when it is one of `choices`.
    #[must_use]
    pub fn chosen(&self, choices: &[OrderStatus]) -> Option<OrderStatus> {
        let value = non_empty(&self.order_status)?;
        choices.iter().find(|s| s.as_str() == value).cloned()
    }
}

/// Whether the request came from HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Format an order date as "Month D, YYYY", or "N/A".
#[must_use]
pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map_or_else(|| "N/A".to_string(), |d| d.format("%B %-d, %Y").to_string())
}

/// Trimmed text, or `None` when blank.
#[must_use]
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse an optional form or query value, treating blanks as absent.
#[must_use]
pub fn parse_opt<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(non_empty).and_then(|v| v.parse().ok())
}

/// Display text for an optional field.
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    value.and_then(non_empty).unwrap_or("-").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum::response::IntoResponse;
    use chrono::NaiveDate;

    use super::*;

    fn location(redirect: Redirect) -> String {
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response.headers()[LOCATION].to_str().unwrap().to_string()
    }

    #[test]
    fn test_flash_redirect_encodes_message() {
        assert_eq!(
            location(redirect_success("/login", "Reset password successfully")),
            "/login?success=Reset%20password%20successfully"
        );
        assert_eq!(
            location(redirect_error("/customer?search=mug", "Failed")),
            "/customer?search=mug&error=Failed"
        );
    }

    #[test]
    fn test_finish_write_outcomes() {
        assert_eq!(
            location(finish_write(Ok(()), "/admin/brands", Some("Deleted"), "Failed")),
            "/admin/brands?success=Deleted"
        );
        assert_eq!(
            location(finish_write(Ok(()), "/customer/cart", None, "Failed")),
            "/customer/cart"
        );

        let rejected = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Brand in use".to_string()),
        };
        assert_eq!(
            location(finish_write(Err(rejected), "/admin/brands", None, "Failed")),
            "/admin/brands?error=Brand%20in%20use"
        );

        let expired = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: None,
        };
        assert!(location(finish_write(Err(expired), "/admin/brands", None, "x"))
            .starts_with("/login?error="));
    }

    #[test]
    fn test_load_failure() {
        let flash = load_failure(ApiError::Decode("bad".to_string()), "Failed to load").unwrap();
        assert_eq!(flash.error.as_deref(), Some("Failed to load"));

        let expired = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: None,
        };
        assert!(load_failure(expired, "x").is_err());
    }

    #[test]
    fn test_flash_from_query_drops_blanks() {
        let flash = Flash::from(MessageQuery {
            error: Some("  ".to_string()),
            success: Some("Saved".to_string()),
        });
        assert_eq!(flash.error, None);
        assert_eq!(flash.success.as_deref(), Some("Saved"));
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(format_date(Some(date)), "March 2, 2025");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_status_form_only_accepts_choices() {
        let form = StatusForm {
            order_status: "Shipped".to_string(),
            order_id: None,
        };
        assert_eq!(
            form.chosen(OrderStatus::SELLER_CHOICES),
            Some(OrderStatus::Shipped)
        );

        let returned = StatusForm {
            order_status: "Returned".to_string(),
            order_id: None,
        };
        assert_eq!(returned.chosen(OrderStatus::SELLER_CHOICES), None);
        assert_eq!(
            returned.chosen(OrderStatus::ADMIN_CHOICES),
            Some(OrderStatus::Returned)
        );
        assert_eq!(StatusForm::default().chosen(OrderStatus::ADMIN_CHOICES), None);

        let options = status_options(OrderStatus::SELLER_CHOICES, &OrderStatus::Delivered);
        assert_eq!(options.len(), 4);
        assert!(options.iter().any(|o| o.selected && o.value == "Delivered"));
    }

    #[test]
    fn test_parse_opt_and_non_empty() {
        assert_eq!(parse_opt::<i32>(Some(" 4 ")), Some(4));
        assert_eq!(parse_opt::<i32>(Some("")), None);
        assert_eq!(parse_opt::<i32>(Some("abc")), None);
        assert_eq!(parse_opt::<i32>(None), None);
        assert_eq!(non_empty("  x "), Some("x"));
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("Pune")), "Pune");
    }
}
