//! User directory repository.
//!
//! Provides lookups, subordinate-id queries for hierarchy resolution, and
//! the reassignment mutations. Reassignment writes both parent-pointer
//! columns in a single UPDATE inside one transaction, so a concurrent reader
//! sees either the old assignment or the new one, never a half-applied mix.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use vistapro_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{NewUser, User};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    role: Role,
    admin_id: Option<i32>,
    super_admin_id: Option<i32>,
    locked: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            role: row.role,
            admin_id: row.admin_id.map(UserId::new),
            super_admin_id: row.super_admin_id.map(UserId::new),
            locked: row.locked,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, name, role, admin_id, super_admin_id, locked, deleted_at, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user directory database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// Soft-deleted users are returned; callers that must not see them
    /// check `deleted_at` themselves.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List live users with the given role, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        ))
        .bind(role)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, name, role, admin_id, super_admin_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(input.email.as_str())
        .bind(&input.name)
        .bind(input.role)
        .bind(input.admin_id)
        .bind(input.super_admin_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Lock or unlock a user account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_locked(&self, id: UserId, locked: bool) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET locked = $2, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(locked)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Soft-delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist or was
    /// already deleted.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Subordinate queries
    // =========================================================================

    /// IDs of live Marketers assigned to the given Admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketer_ids_under_admin(
        &self,
        admin_id: UserId,
    ) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM users
             WHERE role = $1 AND admin_id = $2 AND deleted_at IS NULL",
        )
        .bind(Role::Marketer)
        .bind(admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// IDs of live Marketers assigned directly to the given SuperAdmin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketer_ids_direct_under_super_admin(
        &self,
        super_admin_id: UserId,
    ) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM users
             WHERE role = $1 AND super_admin_id = $2 AND deleted_at IS NULL",
        )
        .bind(Role::Marketer)
        .bind(super_admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// IDs of live Marketers reaching the given SuperAdmin through one of
    /// its Admins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketer_ids_via_admins_of_super_admin(
        &self,
        super_admin_id: UserId,
    ) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>(
            "SELECT m.id FROM users m
             WHERE m.role = $1 AND m.deleted_at IS NULL
               AND m.admin_id IN (
                   SELECT a.id FROM users a
                   WHERE a.role = $2 AND a.super_admin_id = $3 AND a.deleted_at IS NULL
               )",
        )
        .bind(Role::Marketer)
        .bind(Role::Admin)
        .bind(super_admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    // =========================================================================
    // Reassignment
    // =========================================================================

    /// Move a Marketer under an Admin, or unassign with `None`.
    ///
    /// Clears `super_admin_id` in the same statement: a Marketer is under an
    /// Admin or directly under a SuperAdmin, never both.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the marketer or the target
    /// doesn't exist, or the subject isn't a Marketer.
    /// Returns `RepositoryError::InvalidTarget` if the target isn't a live,
    /// unlocked Admin.
    pub async fn reassign_marketer_to_admin(
        &self,
        marketer_id: UserId,
        new_admin_id: Option<UserId>,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        ensure_subject(&mut tx, marketer_id, Role::Marketer).await?;
        if let Some(target_id) = new_admin_id {
            ensure_assignable(&mut tx, target_id, Role::Admin).await?;
        }

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET admin_id = $2, super_admin_id = NULL, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(marketer_id)
        .bind(new_admin_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Assign a Marketer directly to a SuperAdmin, bypassing any Admin.
    ///
    /// Clears `admin_id` in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the marketer or the target
    /// doesn't exist, or the subject isn't a Marketer.
    /// Returns `RepositoryError::InvalidTarget` if the target isn't a live,
    /// unlocked SuperAdmin.
    pub async fn reassign_marketer_to_super_admin(
        &self,
        marketer_id: UserId,
        new_super_admin_id: UserId,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        ensure_subject(&mut tx, marketer_id, Role::Marketer).await?;
        ensure_assignable(&mut tx, new_super_admin_id, Role::SuperAdmin).await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET super_admin_id = $2, admin_id = NULL, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(marketer_id)
        .bind(new_super_admin_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Move an Admin under a SuperAdmin, or unassign with `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the admin or the target
    /// doesn't exist, or the subject isn't an Admin.
    /// Returns `RepositoryError::InvalidTarget` if the target isn't a live,
    /// unlocked SuperAdmin.
    pub async fn reassign_admin_to_super_admin(
        &self,
        admin_id: UserId,
        new_super_admin_id: Option<UserId>,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        ensure_subject(&mut tx, admin_id, Role::Admin).await?;
        if let Some(target_id) = new_super_admin_id {
            ensure_assignable(&mut tx, target_id, Role::SuperAdmin).await?;
        }

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET super_admin_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(admin_id)
        .bind(new_super_admin_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }
}

/// Verify the reassignment subject exists, is live, and has the expected role.
async fn ensure_subject(
    tx: &mut Transaction<'_, Postgres>,
    id: UserId,
    expected_role: Role,
) -> Result<(), RepositoryError> {
    let row: Option<(Role, Option<DateTime<Utc>>)> =
        sqlx::query_as("SELECT role, deleted_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

    match row {
        Some((role, None)) if role == expected_role => Ok(()),
        _ => Err(RepositoryError::NotFound),
    }
}

/// Verify a reassignment target exists and can receive the assignment.
async fn ensure_assignable(
    tx: &mut Transaction<'_, Postgres>,
    id: UserId,
    expected_role: Role,
) -> Result<(), RepositoryError> {
    let row: Option<(Role, bool, Option<DateTime<Utc>>)> =
        sqlx::query_as("SELECT role, locked, deleted_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

    let Some((role, locked, deleted_at)) = row else {
        return Err(RepositoryError::NotFound);
    };

    if role != expected_role {
        return Err(RepositoryError::InvalidTarget(format!(
            "user {id} has role {role}, expected {expected_role}"
        )));
    }
    if deleted_at.is_some() {
        return Err(RepositoryError::InvalidTarget(format!(
            "user {id} is deleted"
        )));
    }
    if locked {
        return Err(RepositoryError::InvalidTarget(format!(
            "user {id} is locked"
        )));
    }

    Ok(())
}
