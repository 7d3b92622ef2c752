//! Integration tests for scoped report endpoints.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p vistapro-cli -- migrate)
//! - The server running (cargo run -p vistapro-server)
//!
//! Run with: cargo test -p vistapro-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("VISTAPRO_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Connect to the database the server under test is using.
async fn test_pool() -> PgPool {
    let url = std::env::var("VISTAPRO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("VISTAPRO_DATABASE_URL or DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Insert a user with a unique email and return its id.
async fn insert_user(
    pool: &PgPool,
    role: &str,
    admin_id: Option<i32>,
    super_admin_id: Option<i32>,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO users (email, name, role, admin_id, super_admin_id)
         VALUES ($1, $2, $3::user_role, $4, $5)
         RETURNING id",
    )
    .bind(format!("{}@test.vistapro.ng", Uuid::new_v4()))
    .bind("Test User")
    .bind(role)
    .bind(admin_id)
    .bind(super_admin_id)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user")
}

/// Insert an order for a marketer and return its id.
async fn insert_order(
    pool: &PgPool,
    marketer_id: i32,
    devices: i32,
    amount: Decimal,
    status: &str,
    days_ago: i32,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO orders
             (marketer_id, device_name, device_model, number_of_devices, sold_amount, status, sale_date)
         VALUES ($1, 'Test Device', 'TD-1', $2, $3, $4::order_status, now() - ($5 || ' days')::interval)
         RETURNING id",
    )
    .bind(marketer_id)
    .bind(devices)
    .bind(amount)
    .bind(status)
    .bind(days_ago)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test order")
}

async fn get_summary(client: &Client, root_id: i32) -> reqwest::Response {
    client
        .get(format!("{}/reports/summary?root_id={root_id}", base_url()))
        .send()
        .await
        .expect("Failed to request summary")
}

fn revenue(body: &Value) -> Decimal {
    body["total_revenue"]
        .as_str()
        .expect("total_revenue should be a decimal string")
        .parse()
        .expect("total_revenue should parse as a decimal")
}

// ============================================================================
// Totals
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_totals_sum_subordinate_orders() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;
    let m1 = insert_user(&pool, "marketer", Some(admin), None).await;
    let m2 = insert_user(&pool, "marketer", Some(admin), None).await;

    // Two identical sales of 100,000 under the same admin
    insert_order(&pool, m1, 1, Decimal::new(100_000_00, 2), "pending", 1).await;
    insert_order(&pool, m2, 2, Decimal::new(100_000_00, 2), "pending", 2).await;

    let resp = get_summary(&client, admin).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("summary should be JSON");
    assert_eq!(revenue(&body), Decimal::new(200_000_00, 2));
    assert_eq!(body["total_orders"], 2);
    assert_eq!(body["total_devices"], 3);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_super_admin_totals_union_direct_and_indirect() {
    let pool = test_pool().await;
    let client = Client::new();

    let super_admin = insert_user(&pool, "super_admin", None, None).await;
    let admin = insert_user(&pool, "admin", None, Some(super_admin)).await;
    let via_admin = insert_user(&pool, "marketer", Some(admin), None).await;
    let direct = insert_user(&pool, "marketer", None, Some(super_admin)).await;

    insert_order(&pool, via_admin, 1, Decimal::new(50_000_00, 2), "approved", 1).await;
    insert_order(&pool, direct, 1, Decimal::new(75_000_00, 2), "approved", 1).await;

    let resp = get_summary(&client, super_admin).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("summary should be JSON");
    assert_eq!(revenue(&body), Decimal::new(125_000_00, 2));
    assert_eq!(body["total_orders"], 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_with_no_marketers_gets_zero_totals() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;

    let resp = get_summary(&client, admin).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("summary should be JSON");
    assert_eq!(revenue(&body), Decimal::ZERO);
    assert_eq!(body["total_orders"], 0);
    assert_eq!(body["total_devices"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_master_admin_sees_all_orders() {
    let pool = test_pool().await;
    let client = Client::new();

    let master = insert_user(&pool, "master_admin", None, None).await;
    // An orphan marketer reachable from no reporting root at all
    let orphan = insert_user(&pool, "marketer", None, None).await;
    insert_order(&pool, orphan, 1, Decimal::new(10_000_00, 2), "pending", 1).await;

    let resp = get_summary(&client, master).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The unscoped view covers every order in storage, including the orphan's
    let body: Value = resp.json().await.expect("summary should be JSON");
    assert!(body["total_orders"].as_i64().expect("count") >= 1);
    assert!(revenue(&body) >= Decimal::new(10_000_00, 2));
}

// ============================================================================
// Filters
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_status_filter_narrows_totals() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;
    let marketer = insert_user(&pool, "marketer", Some(admin), None).await;

    insert_order(&pool, marketer, 1, Decimal::new(40_000_00, 2), "approved", 1).await;
    insert_order(&pool, marketer, 1, Decimal::new(60_000_00, 2), "pending", 1).await;

    let resp = client
        .get(format!(
            "{}/reports/summary?root_id={admin}&status=approved",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to request summary");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("summary should be JSON");
    assert_eq!(revenue(&body), Decimal::new(40_000_00, 2));
    assert_eq!(body["total_orders"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_status_is_bad_request() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;

    let resp = client
        .get(format!(
            "{}/reports/summary?root_id={admin}&status=shipped",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to request summary");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("error should be JSON");
    assert_eq!(body["error"], "bad_request");
}

// ============================================================================
// Order listing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_order_listing_is_newest_first() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;
    let marketer = insert_user(&pool, "marketer", Some(admin), None).await;

    let older = insert_order(&pool, marketer, 1, Decimal::new(10_000_00, 2), "pending", 10).await;
    let newer = insert_order(&pool, marketer, 1, Decimal::new(20_000_00, 2), "pending", 1).await;

    let resp = client
        .get(format!("{}/reports/orders?root_id={admin}", base_url()))
        .send()
        .await
        .expect("Failed to request orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("orders should be JSON");
    let orders = body["orders"].as_array().expect("orders array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], newer);
    assert_eq!(orders[1]["id"], older);
}

// ============================================================================
// Root validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_marketer_root_is_rejected() {
    let pool = test_pool().await;
    let client = Client::new();

    let marketer = insert_user(&pool, "marketer", None, None).await;

    let resp = get_summary(&client, marketer).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("error should be JSON");
    assert_eq!(body["error"], "invalid_root");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_root_is_rejected() {
    let client = Client::new();

    let resp = get_summary(&client, 2_000_000_000).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("error should be JSON");
    assert_eq!(body["error"], "invalid_root");
}
