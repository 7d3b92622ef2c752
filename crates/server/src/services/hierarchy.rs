//! Hierarchy resolution: which Marketers sit under a reporting root.
//!
//! The hierarchy is a fixed two-level tree (SuperAdmin -> Admin -> Marketer),
//! so resolution is a bounded pair of lookups, never a graph traversal. The
//! controllers this replaces re-stated the same two JOINs in every report
//! query; here the shape lives in one place with the depth pinned by
//! [`SUBORDINATE_DEPTH`].

use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;

use vistapro_core::{Role, UserId};

use crate::db::{RepositoryError, UserRepository};

/// Maximum number of parent-pointer hops between a Marketer and the root of
/// its subtree: Marketer -> Admin -> SuperAdmin.
///
/// An Admin cannot itself have an `admin_id`, so the chain cannot silently
/// deepen. Extending the hierarchy means changing this constant and widening
/// the resolver on purpose, not recursing by accident.
pub const SUBORDINATE_DEPTH: u32 = 2;

/// Errors from hierarchy resolution.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The requested root does not exist (or was soft-deleted).
    #[error("reporting root {0} does not exist")]
    RootNotFound(UserId),

    /// The requested root exists but its role cannot own a reporting scope.
    #[error("user {0} has role {1}, which cannot own a reporting scope")]
    NotAReportingRoot(UserId, Role),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Resolves the set of subordinate Marketers for an Admin or SuperAdmin.
pub struct HierarchyResolver<'a> {
    users: UserRepository<'a>,
}

impl<'a> HierarchyResolver<'a> {
    /// Create a resolver over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Compute the set of live Marketer ids under `root_id`.
    ///
    /// - Admin root: the Marketers assigned to that Admin (one level).
    /// - SuperAdmin root: the union of directly-assigned Marketers and the
    ///   Marketers under that SuperAdmin's Admins, deduplicated. A marketer
    ///   row carrying both parent pointers (legacy data) is counted once.
    ///
    /// Zero subordinates is a valid empty set, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::RootNotFound`] if the root is missing or
    /// soft-deleted, [`HierarchyError::NotAReportingRoot`] for any role other
    /// than Admin or SuperAdmin (MasterAdmin is dispatched to the unscoped
    /// view by the caller and never reaches this operation), and
    /// [`HierarchyError::Repository`] on database failure.
    pub async fn resolve_subordinate_marketers(
        &self,
        root_id: UserId,
    ) -> Result<HashSet<UserId>, HierarchyError> {
        let root = self
            .users
            .get_by_id(root_id)
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(HierarchyError::RootNotFound(root_id))?;

        match root.role {
            Role::Admin => {
                let ids = self.users.marketer_ids_under_admin(root_id).await?;
                Ok(ids.into_iter().collect())
            }
            Role::SuperAdmin => {
                let direct = self
                    .users
                    .marketer_ids_direct_under_super_admin(root_id)
                    .await?;
                let via_admins = self
                    .users
                    .marketer_ids_via_admins_of_super_admin(root_id)
                    .await?;
                Ok(merge_subordinate_sets(direct, via_admins))
            }
            role @ (Role::Marketer | Role::MasterAdmin | Role::Dealer) => {
                Err(HierarchyError::NotAReportingRoot(root_id, role))
            }
        }
    }
}

/// Union the direct and via-admin marketer id lists into a set.
///
/// Direct assignments are inserted first; a marketer reachable through both
/// edges collapses to a single membership either way.
fn merge_subordinate_sets(direct: Vec<UserId>, via_admins: Vec<UserId>) -> HashSet<UserId> {
    let mut set: HashSet<UserId> = direct.into_iter().collect();
    set.extend(via_admins);
    set
}
