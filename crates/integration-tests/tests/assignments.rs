//! Integration tests for assignment endpoints and their effect on
//! hierarchy resolution.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p vistapro-cli -- migrate)
//! - The server running (cargo run -p vistapro-server)
//!
//! Run with: cargo test -p vistapro-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
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

/// Insert a locked admin and return its id.
async fn insert_locked_admin(pool: &PgPool) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO users (email, name, role, locked)
         VALUES ($1, 'Locked Admin', 'admin', TRUE)
         RETURNING id",
    )
    .bind(format!("{}@test.vistapro.ng", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("Failed to insert locked admin")
}

/// Fetch the resolved subordinate marketer ids for a root.
async fn subordinates(client: &Client, root_id: i32) -> Vec<i64> {
    let resp = client
        .get(format!("{}/users/{root_id}/subordinates", base_url()))
        .send()
        .await
        .expect("Failed to request subordinates");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("subordinates should be JSON");
    body["marketer_ids"]
        .as_array()
        .expect("marketer_ids array")
        .iter()
        .map(|v| v.as_i64().expect("marketer id"))
        .collect()
}

// ============================================================================
// Reassignment moves scope membership
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reassignment_moves_marketer_between_scopes() {
    let pool = test_pool().await;
    let client = Client::new();

    let super_admin = insert_user(&pool, "super_admin", None, None).await;
    let admin = insert_user(&pool, "admin", None, Some(super_admin)).await;
    let marketer = insert_user(&pool, "marketer", Some(admin), None).await;

    // Reachable through the admin chain
    assert!(subordinates(&client, admin).await.contains(&i64::from(marketer)));
    assert!(subordinates(&client, super_admin).await.contains(&i64::from(marketer)));

    // Unassign: disappears from both scopes
    let resp = client
        .put(format!("{}/marketers/{marketer}/admin", base_url()))
        .json(&json!({ "admin_id": null }))
        .send()
        .await
        .expect("Failed to unassign marketer");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("assignment should be JSON");
    assert_eq!(body["admin_id"], Value::Null);
    assert_eq!(body["super_admin_id"], Value::Null);

    assert!(!subordinates(&client, admin).await.contains(&i64::from(marketer)));
    assert!(!subordinates(&client, super_admin).await.contains(&i64::from(marketer)));

    // Direct assignment to the super admin: reappears in its scope only
    let resp = client
        .put(format!("{}/marketers/{marketer}/super-admin", base_url()))
        .json(&json!({ "super_admin_id": super_admin }))
        .send()
        .await
        .expect("Failed to assign marketer directly");
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(subordinates(&client, super_admin).await.contains(&i64::from(marketer)));
    assert!(!subordinates(&client, admin).await.contains(&i64::from(marketer)));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_assigning_admin_clears_direct_super_admin() {
    let pool = test_pool().await;
    let client = Client::new();

    let super_admin = insert_user(&pool, "super_admin", None, None).await;
    let admin = insert_user(&pool, "admin", None, None).await;
    let marketer = insert_user(&pool, "marketer", None, Some(super_admin)).await;

    let resp = client
        .put(format!("{}/marketers/{marketer}/admin", base_url()))
        .json(&json!({ "admin_id": admin }))
        .send()
        .await
        .expect("Failed to assign marketer");
    assert_eq!(resp.status(), StatusCode::OK);

    // One parent at a time: the direct pointer must be gone
    let body: Value = resp.json().await.expect("assignment should be JSON");
    assert_eq!(body["admin_id"], admin);
    assert_eq!(body["super_admin_id"], Value::Null);

    // The super admin no longer sees the marketer directly
    assert!(!subordinates(&client, super_admin).await.contains(&i64::from(marketer)));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_moving_admin_moves_its_marketers() {
    let pool = test_pool().await;
    let client = Client::new();

    let s1 = insert_user(&pool, "super_admin", None, None).await;
    let s2 = insert_user(&pool, "super_admin", None, None).await;
    let admin = insert_user(&pool, "admin", None, Some(s1)).await;
    let marketer = insert_user(&pool, "marketer", Some(admin), None).await;

    assert!(subordinates(&client, s1).await.contains(&i64::from(marketer)));

    let resp = client
        .put(format!("{}/admins/{admin}/super-admin", base_url()))
        .json(&json!({ "super_admin_id": s2 }))
        .send()
        .await
        .expect("Failed to move admin");
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(!subordinates(&client, s1).await.contains(&i64::from(marketer)));
    assert!(subordinates(&client, s2).await.contains(&i64::from(marketer)));
}

// ============================================================================
// Dedup of legacy dual-parent rows
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_dual_parent_marketer_is_counted_once() {
    let pool = test_pool().await;
    let client = Client::new();

    let super_admin = insert_user(&pool, "super_admin", None, None).await;
    let admin = insert_user(&pool, "admin", None, Some(super_admin)).await;
    // Legacy anomaly: both parent pointers set on the same row
    let marketer = insert_user(&pool, "marketer", Some(admin), Some(super_admin)).await;

    let ids = subordinates(&client, super_admin).await;
    let occurrences = ids.iter().filter(|&&id| id == i64::from(marketer)).count();
    assert_eq!(occurrences, 1);
}

// ============================================================================
// Failure semantics
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reassign_to_missing_target_is_not_found() {
    let pool = test_pool().await;
    let client = Client::new();

    let marketer = insert_user(&pool, "marketer", None, None).await;

    let resp = client
        .put(format!("{}/marketers/{marketer}/admin", base_url()))
        .json(&json!({ "admin_id": 2_000_000_000 }))
        .send()
        .await
        .expect("Failed to send reassignment");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("error should be JSON");
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reassign_to_locked_admin_is_invalid_target() {
    let pool = test_pool().await;
    let client = Client::new();

    let marketer = insert_user(&pool, "marketer", None, None).await;
    let locked_admin = insert_locked_admin(&pool).await;

    let resp = client
        .put(format!("{}/marketers/{marketer}/admin", base_url()))
        .json(&json!({ "admin_id": locked_admin }))
        .send()
        .await
        .expect("Failed to send reassignment");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("error should be JSON");
    assert_eq!(body["error"], "invalid_target");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reassign_non_marketer_subject_is_not_found() {
    let pool = test_pool().await;
    let client = Client::new();

    let admin = insert_user(&pool, "admin", None, None).await;
    let other_admin = insert_user(&pool, "admin", None, None).await;

    // The marketer endpoint must not move an admin
    let resp = client
        .put(format!("{}/marketers/{admin}/admin", base_url()))
        .json(&json!({ "admin_id": other_admin }))
        .send()
        .await
        .expect("Failed to send reassignment");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
