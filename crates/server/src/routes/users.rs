//! Hierarchy route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use vistapro_core::UserId;

use crate::error::AppError;
use crate::services::HierarchyResolver;
use crate::state::AppState;

/// Resolved subordinate set for a reporting root.
///
/// The resolver returns a set with no ordering guarantee; ids are sorted
/// here so the JSON is stable for clients and tests.
#[derive(Debug, Serialize)]
pub struct SubordinatesResponse {
    pub root_id: UserId,
    pub marketer_ids: Vec<UserId>,
}

/// `GET /users/{id}/subordinates` - the Marketer ids under a root.
pub async fn subordinates(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubordinatesResponse>, AppError> {
    let root_id = UserId::new(id);
    let resolver = HierarchyResolver::new(state.pool());

    let subordinates = resolver.resolve_subordinate_marketers(root_id).await?;

    let mut marketer_ids: Vec<UserId> = subordinates.into_iter().collect();
    marketer_ids.sort_unstable();

    Ok(Json(SubordinatesResponse {
        root_id,
        marketer_ids,
    }))
}
