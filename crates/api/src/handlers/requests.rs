//! Handlers for the `/requests` resource.
//!
//! All endpoints require authentication; the engine enforces ownership.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use caretrack_core::request::{RequestFilter, RequestPatch};
use caretrack_db::models::request::{MaintenanceRequest, RequestStats, RequestWithMessages};
use serde::Deserialize;
use validator::Validate;

use crate::engine::requests::{self as engine, NewTicket};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestInput {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub request_type: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub address: Option<String>,
}

/// GET /api/v1/requests?status=&type=&priority=
pub async fn list_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<RequestFilter>,
) -> AppResult<Json<DataResponse<Vec<RequestWithMessages>>>> {
    let requests = engine::list_requests(&state.pool, &auth.actor(), filter).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/requests
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateRequestInput>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceRequest>>)> {
    input.validate()?;
    let ticket = NewTicket {
        request_type: input.request_type,
        description: input.description,
        unit: input.unit,
        address: input.address,
    };
    let request = engine::create_request(
        &state.pool,
        &state.event_bus,
        &state.request_ids,
        &auth.actor(),
        ticket,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/requests/stats/summary
pub async fn get_stats(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RequestStats>>> {
    let stats = engine::get_stats(&state.pool, &auth.actor()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/requests/{id}
pub async fn get_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DataResponse<RequestWithMessages>>> {
    let request = engine::get_request(&state.pool, &auth.actor(), &id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}
///
/// Partial update of lifecycle fields. Admin only.
pub async fn update_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(patch): AppJson<RequestPatch>,
) -> AppResult<Json<DataResponse<MaintenanceRequest>>> {
    let request = engine::update_request(
        &state.pool,
        &state.event_bus,
        state.config.transition_policy,
        &auth.actor(),
        &id,
        patch,
    )
    .await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/requests/{id}
///
/// Removes the ticket and all of its messages. Returns 204 No Content.
pub async fn delete_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<StatusCode> {
    engine::delete_request(&state.pool, &auth.actor(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
