//! User management commands.

use vistapro_core::{Email, Role, UserId};
use vistapro_server::db::{self, RepositoryError, UserRepository};
use vistapro_server::models::user::NewUser;

use super::{CommandError, database_url};

/// Create a new directory user.
///
/// # Errors
///
/// Returns `CommandError` if the role or email is invalid, the database is
/// unreachable, or the email already exists.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    admin_id: Option<i32>,
    super_admin_id: Option<i32>,
) -> Result<(), CommandError> {
    let role: Role = role.parse().map_err(CommandError::InvalidRole)?;
    let email = Email::parse(email)?;

    let pool = db::create_pool(&database_url()?).await?;
    let repo = UserRepository::new(&pool);

    let user = repo
        .create(&NewUser {
            email,
            name: name.to_owned(),
            role,
            admin_id: admin_id.map(UserId::new),
            super_admin_id: super_admin_id.map(UserId::new),
        })
        .await?;

    tracing::info!(id = %user.id, role = %user.role, "User created");
    Ok(())
}

/// List live users with the given role.
///
/// # Errors
///
/// Returns `CommandError` if the role is invalid or the database is
/// unreachable.
pub async fn list(role: &str) -> Result<(), CommandError> {
    let role: Role = role.parse().map_err(CommandError::InvalidRole)?;

    let pool = db::create_pool(&database_url()?).await?;
    let users = UserRepository::new(&pool).list_by_role(role).await?;

    #[allow(clippy::print_stdout)]
    {
        for user in &users {
            let locked = if user.locked { "  [locked]" } else { "" };
            println!("{:>6}  {:<40}  {}{locked}", user.id, user.email, user.name);
        }
        println!("{} user(s)", users.len());
    }

    Ok(())
}

/// Lock or unlock the user with the given email.
///
/// # Errors
///
/// Returns `CommandError` if the email is invalid, the user doesn't exist,
/// or the database is unreachable.
pub async fn set_locked(email: &str, locked: bool) -> Result<(), CommandError> {
    let email = Email::parse(email)?;

    let pool = db::create_pool(&database_url()?).await?;
    let repo = UserRepository::new(&pool);

    let user = repo
        .get_by_email(&email)
        .await?
        .ok_or(CommandError::Repository(RepositoryError::NotFound))?;
    let user = repo.set_locked(user.id, locked).await?;

    tracing::info!(id = %user.id, locked = user.locked, "User lock updated");
    Ok(())
}

/// Soft-delete the user with the given email.
///
/// # Errors
///
/// Returns `CommandError` if the email is invalid, the user doesn't exist,
/// or the database is unreachable.
pub async fn delete(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;

    let pool = db::create_pool(&database_url()?).await?;
    let repo = UserRepository::new(&pool);

    let user = repo
        .get_by_email(&email)
        .await?
        .ok_or(CommandError::Repository(RepositoryError::NotFound))?;
    repo.soft_delete(user.id).await?;

    tracing::info!(id = %user.id, "User soft-deleted");
    Ok(())
}
