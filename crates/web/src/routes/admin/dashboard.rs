//! Admin dashboard counts.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{Flash, MessageQuery, load_failure};
use crate::state::AppState;

const DASHBOARD_FAILED: &str =
    "Failed to load dashboard data. Please check the network connection.";

/// Number of items behind each dashboard card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminStats {
    pub users: usize,
    pub products: usize,
    pub stores: usize,
    pub categories: usize,
    pub orders: usize,
    pub shippers: usize,
}

/// Length of a fetched list, or 0 when the call failed.
pub fn count_or_zero<T>(result: &std::result::Result<Vec<T>, ApiError>, what: &str) -> usize {
    match result {
        Ok(items) => items.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to count {what}");
            0
        }
    }
}

/// Number of dashboard cards, one backend call each.
const CARD_COUNT: usize = 6;

/// Page error for the calls that failed.
///
/// A rejected token anywhere sends the user to sign in. Otherwise the page
/// error is shown only when every card failed.
///
/// # Errors
///
/// Returns `AppError::Api` when any call answered 401.
pub fn dashboard_error(
    mut failures: Vec<ApiError>,
    cards: usize,
) -> std::result::Result<Option<String>, AppError> {
    if let Some(pos) = failures.iter().position(ApiError::is_unauthorized) {
        return Err(failures.swap_remove(pos).into());
    }
    if failures.len() < cards {
        return Ok(None);
    }
    match failures.into_iter().next() {
        Some(first) => Ok(load_failure(first, DASHBOARD_FAILED)?.error),
        None => Ok(None),
    }
}

/// Dashboard page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flash: Flash,
    pub stats: AdminStats,
}

/// Dashboard.
///
/// The six lists are fetched together; each failed call only zeroes its own
/// card. The page error is shown only when nothing could be fetched.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> Result<DashboardTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.admin(&state);

    let (users, products, stores, categories, orders, shippers) = tokio::join!(
        service.get_users(),
        service.get_products(),
        service.get_stores(),
        service.get_categories(),
        service.get_all_orders(),
        service.get_shippers(),
    );

    let stats = AdminStats {
        users: count_or_zero(&users, "users"),
        products: count_or_zero(&products, "products"),
        stores: count_or_zero(&stores, "stores"),
        categories: count_or_zero(&categories, "categories"),
        orders: count_or_zero(&orders, "orders"),
        shippers: count_or_zero(&shippers, "shippers"),
    };

    let failures: Vec<ApiError> = [
        users.err(),
        products.err(),
        stores.err(),
        categories.err(),
        orders.err(),
        shippers.err(),
    ]
    .into_iter()
    .flatten()
    .collect();
    flash = flash.or_error(dashboard_error(failures, CARD_COUNT)?);

    Ok(DashboardTemplate {
        username: user.username,
        flash,
        stats,
    })
}
