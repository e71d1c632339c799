//! Store directory used by the admin store form.

use quitq_core::StoreId;
use reqwest::Method;
use tracing::instrument;

use crate::api::types::{City, Store, StoreUpload};
use crate::api::{ApiClient, ApiError};

/// Store endpoints, including the multipart create.
#[derive(Debug, Clone)]
pub struct StoreService {
    client: ApiClient,
}

impl StoreService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_stores(&self) -> Result<Vec<Store>, ApiError> {
        self.client.get_list("/api/stores").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, upload), fields(store_name = %upload.store_name))]
    pub async fn post_store(&self, upload: StoreUpload) -> Result<(), ApiError> {
        self.client
            .send_multipart(Method::POST, "/api/stores", upload.into_form()?)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn delete_store(&self, id: StoreId) -> Result<(), ApiError> {
        self.client.delete(&format!("/api/stores/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_cities(&self) -> Result<Vec<City>, ApiError> {
        self.client.get_list("/api/cities").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quitq_core::{CityId, UserId};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::services::test_support::authorized_client;

    #[tokio::test]
    async fn test_post_store_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/stores"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("name=\"storeName\""))
            .and(body_string_contains("Corner Shop"))
            .and(body_string_contains("name=\"cityId\""))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        StoreService::new(authorized_client(&server))
            .post_store(StoreUpload {
                store_name: "Corner Shop".to_string(),
                store_description: "Groceries".to_string(),
                city_id: CityId::new(3),
                user_id: Some(UserId::new(7)),
                logo: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_delete_and_cities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"storeId": 1}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/stores/1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/cities"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"cityId": 3, "cityName": "Pune"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = StoreService::new(authorized_client(&server));
        assert_eq!(service.get_stores().await.unwrap().len(), 1);
        service.delete_store(StoreId::new(1)).await.unwrap();
        assert_eq!(
            service.get_cities().await.unwrap()[0].city_name.as_deref(),
            Some("Pune")
        );
    }
}
