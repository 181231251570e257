//! Handlers for the `/messages` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use caretrack_db::models::message::{Message, MessageView};
use serde::Deserialize;
use validator::Validate;

use crate::engine::messaging;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageInput {
    #[validate(length(min = 1, message = "Request ID is required"))]
    pub request_id: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// POST /api/v1/messages
pub async fn post_message(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateMessageInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    input.validate()?;
    let message = messaging::post_message(
        &state.pool,
        &state.event_bus,
        &auth.actor(),
        &input.request_id,
        input.message,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/messages/request/{request_id}
pub async fn list_for_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(request_id): AppPath<String>,
) -> AppResult<Json<DataResponse<Vec<MessageView>>>> {
    let messages = messaging::list_messages(&state.pool, &auth.actor(), &request_id).await?;
    Ok(Json(DataResponse { data: messages }))
}
