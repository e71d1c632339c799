//! Customer cart and wishlist actions against a mocked backend.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use quitq_integration_tests::TestContext;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn signed_in_customer() -> TestContext {
    let mut ctx = TestContext::new().await;
    ctx.mock_login(7, "ravi", "Customer").await;
    ctx.login("ravi", "secret").await;
    ctx
}

#[tokio::test]
async fn test_add_to_cart_with_blank_quantity_adds_one() {
    let mut ctx = signed_in_customer().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .and(body_json(json!({"productId": 5, "quantity": 1})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    let response = ctx
        .post_form("/customer/cart/add", "productId=5&quantity=")
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some("/customer?success=Product%20added%20to%20cart%21")
    );
}

#[tokio::test]
async fn test_move_to_cart_leaves_wishlist_on_cart_failure() {
    let mut ctx = signed_in_customer().await;
    ctx.mock_status("POST", "/api/cart/add", 500).await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    let response = ctx
        .post_form("/customer/wishlist/8/move-to-cart", "")
        .await;

    assert_eq!(
        response.location(),
        Some("/customer/wishlist?error=Failed%20to%20add%20to%20cart.")
    );
}
