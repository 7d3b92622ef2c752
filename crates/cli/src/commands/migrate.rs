//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time. The server never runs them implicitly; this command is the
//! only migration path.

use vistapro_server::db;

use super::{CommandError, database_url};

/// Run pending database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
