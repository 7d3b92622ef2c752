//! Scoped order reports: resolve the actor's scope, then aggregate.

use std::collections::HashSet;

use sqlx::PgPool;

use vistapro_core::{Role, UserId};

use crate::db::{OrderRepository, RepositoryError, UserRepository};
use crate::models::order::{OrderFilter, OrderSummary, OrderTotals};
use crate::services::hierarchy::{HierarchyError, HierarchyResolver};

/// The set of marketers a report ranges over.
#[derive(Debug, Clone)]
pub enum ReportScope {
    /// No filter: every order in storage (MasterAdmin view).
    All,
    /// Exactly these marketers' orders.
    Marketers(HashSet<UserId>),
}

impl ReportScope {
    /// Whether the scope cannot match any order at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Marketers(ids) if ids.is_empty())
    }
}

/// Builds scoped revenue/order reports.
pub struct ReportService<'a> {
    users: UserRepository<'a>,
    orders: OrderRepository<'a>,
    resolver: HierarchyResolver<'a>,
}

impl<'a> ReportService<'a> {
    /// Create a report service over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            orders: OrderRepository::new(pool),
            resolver: HierarchyResolver::new(pool),
        }
    }

    /// Determine the reporting scope for an acting user.
    ///
    /// MasterAdmin sees everything and is dispatched here, before the
    /// resolver is consulted; Admin and SuperAdmin scopes come from
    /// [`HierarchyResolver::resolve_subordinate_marketers`].
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::RootNotFound`] for a missing or deleted
    /// actor, [`HierarchyError::NotAReportingRoot`] for roles with no
    /// reporting scope (Marketer, Dealer), and repository failures.
    pub async fn scope_for(&self, actor_id: UserId) -> Result<ReportScope, HierarchyError> {
        let actor = self
            .users
            .get_by_id(actor_id)
            .await
            .map_err(HierarchyError::Repository)?
            .filter(|u| u.deleted_at.is_none())
            .ok_or(HierarchyError::RootNotFound(actor_id))?;

        match actor.role {
            Role::MasterAdmin => Ok(ReportScope::All),
            Role::Admin | Role::SuperAdmin => {
                let subordinates = self
                    .resolver
                    .resolve_subordinate_marketers(actor_id)
                    .await?;
                Ok(ReportScope::Marketers(subordinates))
            }
            role @ (Role::Marketer | Role::Dealer) => {
                Err(HierarchyError::NotAReportingRoot(actor_id, role))
            }
        }
    }

    /// Totals over the orders visible in the scope.
    ///
    /// An empty scope short-circuits to the zero aggregate without touching
    /// the database: a root with no subordinates gets a valid empty report.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the aggregation query fails.
    pub async fn totals(
        &self,
        scope: &ReportScope,
        filter: &OrderFilter,
    ) -> Result<OrderTotals, RepositoryError> {
        match scope {
            ReportScope::All => self.orders.aggregate(None, filter).await,
            ReportScope::Marketers(ids) if ids.is_empty() => Ok(OrderTotals::zero()),
            ReportScope::Marketers(ids) => {
                let ids: Vec<UserId> = ids.iter().copied().collect();
                self.orders.aggregate(Some(&ids), filter).await
            }
        }
    }

    /// Per-order report lines, newest sale first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_lines(
        &self,
        scope: &ReportScope,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        match scope {
            ReportScope::All => self.orders.list_summaries(None, filter).await,
            ReportScope::Marketers(ids) if ids.is_empty() => Ok(Vec::new()),
            ReportScope::Marketers(ids) => {
                let ids: Vec<UserId> = ids.iter().copied().collect();
                self.orders.list_summaries(Some(&ids), filter).await
            }
        }
    }
}
