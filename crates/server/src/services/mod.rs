//! Business services on top of the repositories.

pub mod hierarchy;
pub mod reports;

pub use hierarchy::{HierarchyError, HierarchyResolver, SUBORDINATE_DEPTH};
pub use reports::{ReportScope, ReportService};
