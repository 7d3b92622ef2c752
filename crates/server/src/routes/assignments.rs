//! Assignment route handlers.
//!
//! Each handler wraps one repository mutation; the one-parent-at-a-time
//! invariant is enforced in the repository's single-statement update, not
//! here.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use vistapro_core::{Role, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::user::User;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body for `PUT /marketers/{id}/admin`. `null` unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignAdminBody {
    pub admin_id: Option<i32>,
}

/// Body for `PUT /marketers/{id}/super-admin`.
#[derive(Debug, Deserialize)]
pub struct AssignSuperAdminBody {
    pub super_admin_id: i32,
}

/// Body for `PUT /admins/{id}/super-admin`. `null` unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignAdminSuperAdminBody {
    pub super_admin_id: Option<i32>,
}

/// The user's assignment after the mutation.
#[derive(Debug, Serialize)]
pub struct AssignmentView {
    pub id: UserId,
    pub role: Role,
    pub admin_id: Option<UserId>,
    pub super_admin_id: Option<UserId>,
}

impl From<User> for AssignmentView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            admin_id: user.admin_id,
            super_admin_id: user.super_admin_id,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `PUT /marketers/{id}/admin` - move a Marketer under an Admin.
pub async fn assign_marketer_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<AssignAdminBody>,
) -> Result<Json<AssignmentView>, AppError> {
    let repo = UserRepository::new(state.pool());

    let user = repo
        .reassign_marketer_to_admin(UserId::new(id), body.admin_id.map(UserId::new))
        .await?;

    Ok(Json(user.into()))
}

/// `PUT /marketers/{id}/super-admin` - assign a Marketer directly to a
/// SuperAdmin, bypassing any Admin.
pub async fn assign_marketer_super_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<AssignSuperAdminBody>,
) -> Result<Json<AssignmentView>, AppError> {
    let repo = UserRepository::new(state.pool());

    let user = repo
        .reassign_marketer_to_super_admin(UserId::new(id), UserId::new(body.super_admin_id))
        .await?;

    Ok(Json(user.into()))
}

/// `PUT /admins/{id}/super-admin` - move an Admin under a SuperAdmin.
pub async fn assign_admin_super_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<AssignAdminSuperAdminBody>,
) -> Result<Json<AssignmentView>, AppError> {
    let repo = UserRepository::new(state.pool());

    let user = repo
        .reassign_admin_to_super_admin(UserId::new(id), body.super_admin_id.map(UserId::new))
        .await?;

    Ok(Json(user.into()))
}
