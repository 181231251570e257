//! User entity model and DTOs.

use caretrack_core::roles::Role;
use caretrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub community: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub community: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            phone: user.phone,
            address: user.address,
            position: user.position,
            community: user.community,
            profile_image: user.profile_image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for inserting a user. The caller hashes the password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub community: Option<String>,
    pub profile_image: Option<String>,
}

/// Partial profile update. `None` leaves a column untouched.
///
/// `profile_image` uses `Option<Option<String>>` so `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub community: Option<String>,
    pub profile_image: Option<Option<String>>,
}
