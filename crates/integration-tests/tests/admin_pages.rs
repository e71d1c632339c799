//! Admin pages against a mocked backend.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use quitq_integration_tests::TestContext;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn signed_in_admin() -> TestContext {
    let mut ctx = TestContext::new().await;
    ctx.mock_login(1, "asha", "Admin").await;
    ctx.login("asha", "secret").await;
    ctx
}

#[tokio::test]
async fn test_delete_user_then_list_refreshes() {
    let mut ctx = signed_in_admin().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"userId": 1, "firstName": "Asha", "lastName": "Rao", "userTypeId": 1},
            {"userId": 2, "firstName": "Vikram", "lastName": "Sen", "userTypeId": 3},
        ])))
        .up_to_n_times(1)
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"userId": 1, "firstName": "Asha", "lastName": "Rao", "userTypeId": 1},
        ])))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/2"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    let before = ctx.get("/admin/users").await;
    assert!(before.body.contains("Vikram Sen"));

    let deleted = ctx.post_form("/admin/users/2/delete", "").await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert_eq!(
        deleted.location(),
        Some("/admin/users?success=User%20deleted%20successfully%21")
    );

    let after = ctx
        .get("/admin/users?success=User%20deleted%20successfully%21")
        .await;
    assert_eq!(after.status, StatusCode::OK);
    assert!(after.body.contains("User deleted successfully!"));
    assert!(after.body.contains("Asha Rao"));
    assert!(!after.body.contains("Vikram Sen"));
}

#[tokio::test]
async fn test_failed_delete_reports_error() {
    let mut ctx = signed_in_admin().await;
    ctx.mock_status("DELETE", "/api/brands/4", 500).await;

    let response = ctx.post_form("/admin/brands/4/delete", "").await;
    assert_eq!(
        response.location(),
        Some("/admin/brands?error=Failed%20to%20delete%20brand.")
    );
}

#[tokio::test]
async fn test_expired_token_returns_to_login() {
    let mut ctx = signed_in_admin().await;
    ctx.mock_status("GET", "/api/users", 401).await;

    let response = ctx.get("/admin/users").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.location().unwrap().starts_with("/login"));
}

#[tokio::test]
async fn test_dashboard_survives_partial_failure() {
    let mut ctx = signed_in_admin().await;
    ctx.mock_get("/api/users", json!([{"userId": 1}, {"userId": 2}, {"userId": 3}]))
        .await;
    ctx.mock_get("/api/stores", json!([{"storeId": 1}])).await;
    ctx.mock_status("GET", "/api/products", 500).await;

    let page = ctx.get("/admin").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h3>Total Users</h3><p>3</p>"));
    assert!(page.body.contains("<h3>Total Stores</h3><p>1</p>"));
    assert!(page.body.contains("<h3>Total Products</h3><p>0</p>"));
    assert!(!page.body.contains("Failed to load dashboard data"));
}

#[tokio::test]
async fn test_dashboard_expired_token_on_one_card() {
    let mut ctx = signed_in_admin().await;
    ctx.mock_get("/api/users", json!([{"userId": 1}])).await;
    ctx.mock_status("GET", "/api/shipment/all", 401).await;

    let page = ctx.get("/admin").await;

    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert!(page.location().unwrap().starts_with("/login"));
}

#[tokio::test]
async fn test_dashboard_reports_total_failure() {
    let mut ctx = signed_in_admin().await;

    // Nothing mounted: every listing answers 404.
    let page = ctx.get("/admin").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Failed to load dashboard data"));
}

#[tokio::test]
async fn test_shipper_otp_validation() {
    let mut ctx = signed_in_admin().await;
    Mock::given(method("POST"))
        .and(path("/api/shipment/validateotp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&ctx.backend)
        .await;

    let response = ctx
        .post_form("/admin/shippers/4/validate-otp", "otp=123456&orderId=9")
        .await;
    assert_eq!(
        response.location(),
        Some("/admin/shippers?error=OTP%20for%20Shipper%20ID%204%20is%20invalid.")
    );

    let missing = ctx.post_form("/admin/shippers/4/validate-otp", "otp=").await;
    assert_eq!(
        missing.location(),
        Some("/admin/shippers?error=Please%20enter%20OTP%20to%20validate.")
    );
}
