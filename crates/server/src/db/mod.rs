//! Database operations for the Vistapro `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - User directory with role and parent-pointer fields
//! - `orders` - Device sales recorded by Marketers
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p vistapro-cli -- migrate
//! ```
//! They are never run implicitly at server startup.

pub mod orders;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Reassignment target exists but cannot receive the assignment
    /// (wrong role, locked, or soft-deleted).
    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is constructed once at startup and handed to repositories by
/// reference; no module-level singleton exists anywhere in this crate.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
