//! Repository for the `users` table.

use caretrack_core::roles::Role;
use caretrack_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, password_hash, name, role, phone, address, position, \
                       community, profile_image, created_at, updated_at";

/// Provides account lookups and profile updates.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email surfaces as a unique violation on `uq_users_email`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                (email, password_hash, name, role, phone, address, position, community, profile_image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(input.role.as_str())
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.position)
            .bind(&input.community)
            .bind(&input.profile_image)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email. Emails are stored as given and matched exactly.
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// IDs of every user holding `role`, lowest first.
    pub async fn list_ids_by_role<'e>(
        executor: impl PgExecutor<'e>,
        role: Role,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users WHERE role = $1 ORDER BY id ASC")
            .bind(role.as_str())
            .fetch_all(executor)
            .await
    }

    /// Update profile attributes. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no user with the given `id` exists.
    pub async fn update_profile<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let (image_provided, image_value) = match &input.profile_image {
            Some(v) => (true, v.as_deref()),
            None => (false, None),
        };
        let query = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                address = COALESCE($4, address), \
                position = COALESCE($5, position), \
                community = COALESCE($6, community), \
                profile_image = CASE WHEN $7 THEN $8 ELSE profile_image END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.position)
            .bind(&input.community)
            .bind(image_provided)
            .bind(image_value)
            .fetch_optional(executor)
            .await
    }

    /// Replace the stored password hash. Returns `true` if a row was updated.
    pub async fn update_password<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
