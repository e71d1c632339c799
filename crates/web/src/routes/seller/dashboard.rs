//! Seller dashboard statistics.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use quitq_core::{OrderStatus, Price};
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::{Order, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSeller;
use crate::routes::seller::for_each_store;
use crate::routes::{Flash, MessageQuery, load_failure};
use crate::state::AppState;

/// Figures shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SellerStats {
    pub product_count: usize,
    /// Orders still `Processing`.
    pub pending_orders: usize,
    /// Sum of every order total except cancelled ones.
    pub revenue: Price,
}

impl SellerStats {
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order]) -> Self {
        Self {
            product_count: products.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status() == OrderStatus::Processing)
                .count(),
            revenue: orders
                .iter()
                .filter(|o| o.status() != OrderStatus::Cancelled)
                .map(Order::total)
                .sum(),
        }
    }
}

/// Dashboard page.
#[derive(Template, WebTemplate)]
#[template(path = "seller/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flash: Flash,
    pub store_count: usize,
    pub product_count: usize,
    pub pending_orders: usize,
    pub revenue: String,
}

/// Dashboard.
#[instrument(skip(state, user, messages))]
pub async fn index(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Query(messages): Query<MessageQuery>,
) -> Result<DashboardTemplate> {
    let mut flash = Flash::from(messages);
    let service = user.seller(&state);

    let loaded = match user.user_id {
        None => {
            flash.error = Some("Please log in to view the dashboard.".to_string());
            None
        }
        Some(user_id) => {
            let result: std::result::Result<_, ApiError> = async {
                let stores = service.get_user_stores(user_id).await?;
                let (products, orders) = tokio::try_join!(
                    for_each_store(&stores, |id| service.get_products_by_store(id)),
                    for_each_store(&stores, |id| service.get_orders_by_store(id)),
                )?;
                Ok((stores.len(), SellerStats::compute(&products, &orders)))
            }
            .await;

            match result {
                Ok(loaded) => Some(loaded),
                Err(e) => {
                    flash = flash.or_error(
                        load_failure(
                            e,
                            "Could not load dashboard data. An API might be unavailable.",
                        )?
                        .error,
                    );
                    None
                }
            }
        }
    };

    let (store_count, stats) = loaded.unwrap_or_default();
    Ok(DashboardTemplate {
        username: user.username,
        flash,
        store_count,
        product_count: stats.product_count,
        pending_orders: stats.pending_orders,
        revenue: stats.revenue.display(),
    })
}
