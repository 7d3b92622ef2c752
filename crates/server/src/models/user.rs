//! User directory domain types.
//!
//! A user row carries at most one live parent pointer: a Marketer points at
//! an Admin (`admin_id`) or directly at a SuperAdmin (`super_admin_id`), and
//! an Admin points at its SuperAdmin through `super_admin_id`. Reassignment
//! always writes both fields together so the pair can never drift apart.

use chrono::{DateTime, Utc};

use vistapro_core::{Email, Role, UserId};

/// A directory user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique across the directory).
    pub email: Email,
    /// User's display name.
    pub name: String,
    /// User's role in the hierarchy.
    pub role: Role,
    /// Parent Admin, when this user is a Marketer assigned to one.
    pub admin_id: Option<UserId>,
    /// Parent SuperAdmin: direct assignment for a Marketer, reporting
    /// parent for an Admin.
    pub super_admin_id: Option<UserId>,
    /// Whether the account is locked out of the application.
    pub locked: bool,
    /// Soft-delete timestamp; a deleted user is invisible to resolution.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user is neither locked nor soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.locked && self.deleted_at.is_none()
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub admin_id: Option<UserId>,
    pub super_admin_id: Option<UserId>,
}
