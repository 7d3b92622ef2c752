//! Report route handlers.
//!
//! Both endpoints resolve the acting root to a [`ReportScope`] first:
//! MasterAdmin becomes the unscoped view, Admin/SuperAdmin go through the
//! hierarchy resolver, and anything else is rejected as an invalid root.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vistapro_core::UserId;

use crate::error::AppError;
use crate::models::order::{OrderFilter, OrderSummary, OrderTotals};
use crate::services::ReportService;
use crate::state::AppState;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// The acting user whose scope the report covers.
    pub root_id: i32,
    /// Optional order status filter (`pending`, `approved`, ...).
    pub status: Option<String>,
    /// Inclusive start of the sale-date window (YYYY-MM-DD).
    pub start: Option<NaiveDate>,
    /// Inclusive end of the sale-date window (YYYY-MM-DD).
    pub end: Option<NaiveDate>,
}

impl ReportQuery {
    fn root_id(&self) -> UserId {
        UserId::new(self.root_id)
    }

    fn filter(&self) -> Result<OrderFilter, AppError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(AppError::BadRequest)?;

        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(AppError::BadRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }

        Ok(OrderFilter {
            status,
            start: self.start,
            end: self.end,
        })
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Per-order report response.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /reports/summary` - totals over the acting root's scope.
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<OrderTotals>, AppError> {
    let filter = query.filter()?;
    let service = ReportService::new(state.pool());

    let scope = service.scope_for(query.root_id()).await?;
    let totals = service.totals(&scope, &filter).await?;

    Ok(Json(totals))
}

/// `GET /reports/orders` - per-order lines over the acting root's scope.
pub async fn orders(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<OrdersResponse>, AppError> {
    let filter = query.filter()?;
    let service = ReportService::new(state.pool());

    let scope = service.scope_for(query.root_id()).await?;
    let orders = service.order_lines(&scope, &filter).await?;

    Ok(Json(OrdersResponse { orders }))
}
