//! Domain types for the hierarchy and reporting service.

pub mod order;
pub mod user;

pub use order::{NewOrder, Order, OrderFilter, OrderSummary, OrderTotals};
pub use user::{NewUser, User};
