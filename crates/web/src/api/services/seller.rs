//! Seller endpoints: store inventory, store orders and shipment handling.

use quitq_core::{CategoryId, ProductId, ShipmentId, StoreId, UserId};
use reqwest::Method;
use tracing::instrument;

use crate::api::types::{
    Brand, Category, Order, Product, ProductUpload, Store, Subcategory, UpdateOrderRequest,
    ValidateOtpRequest,
};
use crate::api::{ApiClient, ApiError};

/// Seller-facing endpoints.
#[derive(Debug, Clone)]
pub struct SellerService {
    client: ApiClient,
}

impl SellerService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_user_stores(&self, user_id: UserId) -> Result<Vec<Store>, ApiError> {
        self.client
            .get_list(&format!("/api/stores/userstores/{user_id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_products_by_store(&self, store_id: StoreId) -> Result<Vec<Product>, ApiError> {
        self.client
            .get_list(&format!("/api/products/bystore/{store_id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, upload), fields(product_name = %upload.product_name))]
    pub async fn create_product(&self, upload: ProductUpload) -> Result<(), ApiError> {
        self.client
            .send_multipart(Method::POST, "/api/products", upload.into_form()?)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, upload))]
    pub async fn update_product(&self, id: ProductId, upload: ProductUpload) -> Result<(), ApiError> {
        self.client
            .send_multipart(
                Method::PUT,
                &format!("/api/products/{id}"),
                upload.into_form()?,
            )
            .await
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

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn update_order(&self, request: &UpdateOrderRequest) -> Result<(), ApiError> {
        self.client
            .send_json(Method::PUT, "/api/shipment/updateorder", request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn generate_otp(&self, ship_id: ShipmentId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("/api/shipment/generateotp/{ship_id}"))
            .await
    }

    /// Submit a delivery OTP. Any success status counts as validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn validate_otp(&self, request: &ValidateOtpRequest) -> Result<(), ApiError> {
        self.client
            .send_json(Method::POST, "/api/shipment/validateotp", request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get_list("/api/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.client.get_list("/api/brands").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_subcategories_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, ApiError> {
        self.client
            .get_list(&format!("/api/categories/{category_id}/subcategories"))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quitq_core::{BrandId, OrderId, OrderStatus, SubcategoryId};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::services::test_support::{authorized_client, bearer};
    use crate::api::types::FileUpload;

    fn upload() -> ProductUpload {
        ProductUpload {
            product_name: "Desk Lamp".to_string(),
            price: "29.99".to_string(),
            quantity: "10".to_string(),
            category_id: CategoryId::new(2),
            sub_category_id: Some(SubcategoryId::new(5)),
            brand_id: BrandId::new(3),
            store_id: StoreId::new(1),
            image: Some(FileUpload {
                file_name: "lamp.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: b"fake-png-bytes".to_vec(),
            }),
        }
    }

    #[tokio::test]
    async fn test_store_lookups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/userstores/7"))
            .and(header("authorization", bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"storeId": 1}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/bystore/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"productId": 2}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/order/store/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .expect(1)
            .mount(&server)
            .await;

        let service = SellerService::new(authorized_client(&server));
        let stores = service.get_user_stores(UserId::new(7)).await.unwrap();
        assert_eq!(stores[0].store_id, StoreId::new(1));
        assert_eq!(
            service
                .get_products_by_store(StoreId::new(1))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            service
                .get_orders_by_store(StoreId::new(1))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_create_product_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"productName\""))
            .and(body_string_contains("Desk Lamp"))
            .and(body_string_contains("name=\"subCategoryId\""))
            .and(body_string_contains("filename=\"lamp.png\""))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        SellerService::new(authorized_client(&server))
            .create_product(upload())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_product_uses_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/products/44"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut upload = upload();
        upload.image = None;
        SellerService::new(authorized_client(&server))
            .update_product(ProductId::new(44), upload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shipment_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/shipment/updateorder"))
            .and(body_json(json!({"orderId": 31, "orderStatus": "Shipped"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/generateotp/6"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/shipment/validateotp"))
            .and(body_json(json!({"shipperId": 7, "OTP": "1234", "orderId": 31})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let service = SellerService::new(authorized_client(&server));
        service
            .update_order(&UpdateOrderRequest {
                order_id: OrderId::new(31),
                order_status: OrderStatus::Shipped,
            })
            .await
            .unwrap();
        service.generate_otp(ShipmentId::new(6)).await.unwrap();
        service
            .validate_otp(&ValidateOtpRequest {
                shipper_id: 7,
                otp: "1234".to_string(),
                order_id: OrderId::new(31),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_subcategories_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories/2/subcategories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"subCategoryId": 5, "subCategoryName": "Lamps", "categoryId": 2}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let subs = SellerService::new(authorized_client(&server))
            .get_subcategories_by_category_id(CategoryId::new(2))
            .await
            .unwrap();
        assert_eq!(subs[0].sub_category_name.as_deref(), Some("Lamps"));
    }
}
