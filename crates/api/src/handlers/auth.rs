//! Handlers for the `/auth` resource (register, login, profile, password).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use caretrack_core::error::CoreError;
use caretrack_core::patch::deserialize_present;
use caretrack_core::roles::Role;
use caretrack_db::models::user::{CreateUser, UpdateProfile, User, UserResponse};
use caretrack_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    /// Kept for homeowners only.
    pub address: Option<String>,
    /// Kept for admins only.
    pub position: Option<String>,
    /// Kept for admins only.
    pub community: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `PUT /auth/profile`. Absent fields are left alone.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub community: Option<String>,
    /// `null` clears the avatar.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub profile_image: Option<Option<String>>,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and sign it in. Only the attributes relevant to the
/// chosen role are stored.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    input.validate()?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(CoreError::Validation("Email already registered".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let is_admin = input.role.is_admin();
    let create = CreateUser {
        profile_image: Some(default_avatar(&input.name)?),
        email: input.email,
        password_hash,
        name: input.name,
        role: input.role,
        phone: input.phone,
        address: if is_admin { None } else { input.address },
        position: if is_admin { input.position } else { None },
        community: if is_admin { input.community } else { None },
    };
    let user = UserRepo::create(&state.pool, &create).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let response = auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    input.validate()?;
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(DataResponse {
        data: auth_response(&state, user)?,
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, &auth).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/auth/profile
///
/// Homeowners may change `address`; admins `position` and `community`.
/// Fields belonging to the other role are ignored.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;

    let is_admin = auth.role.is_admin();
    let update = UpdateProfile {
        name: input.name,
        phone: input.phone,
        address: if is_admin { None } else { input.address },
        position: if is_admin { input.position } else { None },
        community: if is_admin { input.community } else { None },
        profile_image: input.profile_image,
    };

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;
    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/auth/password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    input.validate()?;
    let user = find_user(&state, &auth).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(CoreError::Unauthorized("Current password is incorrect".into()).into());
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &new_hash).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "Password updated successfully",
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    Ok(UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?)
}

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/png";

/// Generated avatar seeded by the user's name.
fn default_avatar(name: &str) -> AppResult<String> {
    let url = Url::parse_with_params(AVATAR_BASE, &[("seed", name.trim())])
        .map_err(|e| AppError::InternalError(format!("Avatar URL error: {e}")))?;
    Ok(url.into())
}

/// Digits, spaces and hyphens, with an optional leading `+`.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let well_formed = !digits.is_empty()
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Invalid phone number".into()))
    }
}
