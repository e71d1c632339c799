//! Seller pages: dashboard, products and orders across the seller's stores.
//!
//! A seller may own several stores. Every page first lists the stores, then
//! fans out one call per store. Those per-store batches fail as a unit: if
//! any call fails the page shows its error instead of partial data.

pub mod dashboard;
pub mod orders;
pub mod products;

use std::future::Future;

use futures::future::try_join_all;
use quitq_core::{StoreId, UserId};

use crate::api::types::Store;
use crate::api::{ApiError, SellerService};

/// Landing page of the seller tree.
pub const SELLER_HOME: &str = "/seller-dashboard";

/// Run `fetch` for every store concurrently and concatenate the results.
///
/// # Errors
///
/// Returns the first error when any store's call fails.
pub async fn for_each_store<T, F, Fut>(stores: &[Store], fetch: F) -> Result<Vec<T>, ApiError>
where
    F: Fn(StoreId) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let lists = try_join_all(stores.iter().map(|s| fetch(s.store_id))).await?;
    Ok(lists.into_iter().flatten().collect())
}

/// The seller's stores followed by `fetch` over each of them.
///
/// # Errors
///
/// Returns an error when the store list or any per-store call fails.
pub async fn across_stores<T, F, Fut>(
    service: &SellerService,
    user_id: UserId,
    fetch: F,
) -> Result<(Vec<Store>, Vec<T>), ApiError>
where
    F: Fn(StoreId) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let stores = service.get_user_stores(user_id).await?;
    let items = for_each_store(&stores, fetch).await?;
    Ok((stores, items))
}

/// Display name of a store id, or "N/A".
#[must_use]
pub fn store_name(stores: &[Store], id: Option<StoreId>) -> String {
    id.and_then(|id| stores.iter().find(|s| s.store_id == id))
        .and_then(|s| s.store_name.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn stores(ids: &[i32]) -> Vec<Store> {
        ids.iter()
            .map(|id| Store {
                store_id: StoreId::new(*id),
                store_name: Some(format!("Store {id}")),
                store_description: None,
                city_id: None,
                user_id: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_for_each_store_concatenates() {
        let result = for_each_store(&stores(&[1, 2]), |id| async move {
            Ok::<_, ApiError>(vec![id.as_i32() * 10, id.as_i32() * 10 + 1])
        })
        .await
        .unwrap();
        assert_eq!(result, vec![10, 11, 20, 21]);

        let empty: Vec<i32> = for_each_store(&[], |_| async { Ok(vec![1]) }).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_for_each_store_fails_as_a_unit() {
        let result = for_each_store(&stores(&[1, 2, 3]), |id| async move {
            if id.as_i32() == 2 {
                Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: None,
                })
            } else {
                Ok(vec![id.as_i32()])
            }
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_store_name() {
        let stores = stores(&[1]);
        assert_eq!(store_name(&stores, Some(StoreId::new(1))), "Store 1");
        assert_eq!(store_name(&stores, Some(StoreId::new(9))), "N/A");
        assert_eq!(store_name(&stores, None), "N/A");
    }
}
