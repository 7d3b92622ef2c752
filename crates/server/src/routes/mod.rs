//! HTTP route handlers for the hierarchy and reporting API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database connectivity)
//!
//! # Reports (scoped by the acting root)
//! GET  /reports/summary             - Revenue/order/device totals
//! GET  /reports/orders              - Per-order list, newest sale first
//!
//! # Hierarchy
//! GET  /users/{id}/subordinates     - Resolved subordinate Marketer ids
//!
//! # Assignment
//! PUT  /marketers/{id}/admin        - Move a Marketer under an Admin (or unassign)
//! PUT  /marketers/{id}/super-admin  - Assign a Marketer directly to a SuperAdmin
//! PUT  /admins/{id}/super-admin     - Move an Admin under a SuperAdmin (or unassign)
//! ```
//!
//! Authentication lives in front of this service; handlers take the acting
//! root from request parameters and trust the gateway to have verified it.

pub mod assignments;
pub mod reports;
pub mod users;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Reports
        .route("/reports/summary", get(reports::summary))
        .route("/reports/orders", get(reports::orders))
        // Hierarchy
        .route("/users/{id}/subordinates", get(users::subordinates))
        // Assignment
        .route(
            "/marketers/{id}/admin",
            put(assignments::assign_marketer_admin),
        )
        .route(
            "/marketers/{id}/super-admin",
            put(assignments::assign_marketer_super_admin),
        )
        .route(
            "/admins/{id}/super-admin",
            put(assignments::assign_admin_super_admin),
        )
}
