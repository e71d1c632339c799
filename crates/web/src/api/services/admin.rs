//! Administration endpoints: every list, every delete, and shipment control.

use quitq_core::{
    BrandId, CategoryId, CityId, GenderId, OrderId, OrderStatus, ProductId, ShipmentId, StateId,
    StoreId, UserId,
};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::api::types::{
    Brand, Category, City, DeliveryStatusRequest, Gender, Order, Product, Shipment, State, Store,
    Subcategory, UpdateOrderRequest, User, ValidateOtpRequest,
};
use crate::api::{ApiClient, ApiError};

/// Admin-facing endpoints.
#[derive(Debug, Clone)]
pub struct AdminService {
    client: ApiClient,
}

/// Generates a `get_*` list method and a `delete_*` method for one resource.
macro_rules! list_and_delete {
    ($get:ident, $delete:ident, $item:ty, $id:ty, $path:literal) => {
        /// # Errors
        ///
        /// Returns an error if the request fails or the backend rejects it.
        #[instrument(skip(self))]
        pub async fn $get(&self) -> Result<Vec<$item>, ApiError> {
            self.client.get_list($path).await
        }

        /// # Errors
        ///
        /// Returns an error if the request fails or the backend rejects it.
        #[instrument(skip(self))]
        pub async fn $delete(&self, id: $id) -> Result<(), ApiError> {
            self.client.delete(&format!(concat!($path, "/{}"), id)).await
        }
    };
}

impl AdminService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    list_and_delete!(get_users, delete_user, User, UserId, "api/users");
    list_and_delete!(get_products, delete_product, Product, ProductId, "api/products");
    list_and_delete!(get_stores, delete_store, Store, StoreId, "api/stores");
    list_and_delete!(get_categories, delete_category, Category, CategoryId, "api/categories");
    list_and_delete!(get_brands, delete_brand, Brand, BrandId, "api/brands");
    list_and_delete!(get_states, delete_state, State, StateId, "api/states");
    list_and_delete!(get_cities, delete_city, City, CityId, "api/cities");
    list_and_delete!(get_genders, delete_gender, Gender, GenderId, "api/genders");

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_subcategories(&self) -> Result<Vec<Subcategory>, ApiError> {
        self.client.get_list("api/subcategories").await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.client.get_list("/api/order/all").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_orders_by_store(&self, store_id: StoreId) -> Result<Vec<Order>, ApiError> {
        self.client
            .get_list(&format!("/api/order/store/{store_id}"))
            .await
    }

    // =========================================================================
    // Shipments
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_shippers(&self) -> Result<Vec<Shipment>, ApiError> {
        self.client.get_list("/api/shipment/all").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_shipper_by_id(&self, id: ShipmentId) -> Result<Shipment, ApiError> {
        self.client.get(&format!("/api/shipment/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        order_status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = UpdateOrderRequest {
            order_id,
            order_status,
        };
        self.client
            .send_json(Method::PUT, "/api/shipment/updateorder", &request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn update_delivery_status(
        &self,
        ship_id: ShipmentId,
        order_id: OrderId,
        order_status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = DeliveryStatusRequest {
            ship_id,
            order_id,
            order_status,
        };
        self.client
            .send_json(Method::PUT, "/api/shipment/update-delivery-status", &request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn generate_shipper_otp(&self, id: ShipmentId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("/api/shipment/generateotp/{id}"))
            .await
    }

    /// Submit a delivery OTP for a shipment.
    ///
    /// Returns `true` only when the backend answers with the JSON literal
    /// `true`; any other successful body means the code was wrong.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, otp))]
    pub async fn validate_shipper_otp(
        &self,
        shipper_id: ShipmentId,
        otp: &str,
        order_id: OrderId,
    ) -> Result<bool, ApiError> {
        let request = ValidateOtpRequest {
            shipper_id: shipper_id.as_i32(),
            otp: otp.to_string(),
            order_id,
        };
        let body = self
            .client
            .post_json_text("/api/shipment/validateotp", &request)
            .await?;
        Ok(serde_json::from_str::<Value>(body.trim()).ok() == Some(Value::Bool(true)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::services::test_support::{authorized_client, bearer};

    #[tokio::test]
    async fn test_lists_use_expected_paths() {
        let server = MockServer::start().await;
        for (route, body) in [
            ("/api/users", json!([{"userId": 1}])),
            ("/api/stores", json!([{"storeId": 1}, {"storeId": 2}])),
            ("/api/subcategories", json!([{"subCategoryId": 1}])),
            ("/api/cities", json!([{"cityId": 1, "stateId": 2}])),
            ("/api/order/all", json!([])),
            ("/api/shipment/all", json!([{"shipperId": 4, "orderId": 9}])),
        ] {
            Mock::given(method("GET"))
                .and(path(route))
                .and(header("authorization", bearer().as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&server)
                .await;
        }

        let service = AdminService::new(authorized_client(&server));
        assert_eq!(service.get_users().await.unwrap().len(), 1);
        assert_eq!(service.get_stores().await.unwrap().len(), 2);
        assert_eq!(service.get_subcategories().await.unwrap().len(), 1);
        assert_eq!(service.get_cities().await.unwrap().len(), 1);
        assert!(service.get_all_orders().await.unwrap().is_empty());
        assert_eq!(
            service.get_shippers().await.unwrap()[0].order_id,
            Some(OrderId::new(9))
        );
    }

    #[tokio::test]
    async fn test_deletes_use_expected_paths() {
        let server = MockServer::start().await;
        for route in [
            "/api/users/1",
            "/api/products/2",
            "/api/stores/3",
            "/api/categories/4",
            "/api/brands/5",
            "/api/states/6",
            "/api/cities/7",
            "/api/genders/8",
        ] {
            Mock::given(method("DELETE"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let service = AdminService::new(authorized_client(&server));
        service.delete_user(UserId::new(1)).await.unwrap();
        service.delete_product(ProductId::new(2)).await.unwrap();
        service.delete_store(StoreId::new(3)).await.unwrap();
        service.delete_category(CategoryId::new(4)).await.unwrap();
        service.delete_brand(BrandId::new(5)).await.unwrap();
        service.delete_state(StateId::new(6)).await.unwrap();
        service.delete_city(CityId::new(7)).await.unwrap();
        service.delete_gender(GenderId::new(8)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/categories/4"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"message": "Category has products"})),
            )
            .mount(&server)
            .await;

        let err = AdminService::new(authorized_client(&server))
            .delete_category(CategoryId::new(4))
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed"), "Category has products");
    }

    #[tokio::test]
    async fn test_status_update_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/shipment/updateorder"))
            .and(body_json(json!({"orderId": 9, "orderStatus": "Shipped"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/shipment/update-delivery-status"))
            .and(body_json(
                json!({"shipId": 4, "orderId": 9, "orderStatus": "Delivered"}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let service = AdminService::new(authorized_client(&server));
        service
            .update_order_status(OrderId::new(9), OrderStatus::Shipped)
            .await
            .unwrap();
        service
            .update_delivery_status(ShipmentId::new(4), OrderId::new(9), OrderStatus::Delivered)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_and_validate_otp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/generateotp/4"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/validateotp"))
            .and(body_json(json!({"shipperId": 4, "OTP": "111111", "orderId": 9})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/validateotp"))
            .and(body_json(json!({"shipperId": 4, "OTP": "000000", "orderId": 9})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .mount(&server)
            .await;

        let service = AdminService::new(authorized_client(&server));
        service
            .generate_shipper_otp(ShipmentId::new(4))
            .await
            .unwrap();
        assert!(
            service
                .validate_shipper_otp(ShipmentId::new(4), "111111", OrderId::new(9))
                .await
                .unwrap()
        );
        assert!(
            !service
                .validate_shipper_otp(ShipmentId::new(4), "000000", OrderId::new(9))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_validate_otp_plain_text_body_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/validateotp"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Invalid OTP"))
            .mount(&server)
            .await;

        let service = AdminService::new(authorized_client(&server));
        let valid = service
            .validate_shipper_otp(ShipmentId::new(4), "123", OrderId::new(9))
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn test_validate_otp_rejection_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/validateotp"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid OTP"))
            .mount(&server)
            .await;

        let service = AdminService::new(authorized_client(&server));
        assert!(
            service
                .validate_shipper_otp(ShipmentId::new(4), "123", OrderId::new(9))
                .await
                .is_err()
        );
    }
}
