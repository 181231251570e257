//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and only ever
//! touch the caller's own notifications.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use caretrack_core::types::DbId;
use caretrack_db::models::notification::Notification;
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::engine::dispatcher;
use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Restrict to read (`true`) or unread (`false`) notifications.
    pub is_read: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

// ---------------------------------------------------------------------------
// Notification CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications =
        dispatcher::list_for_user(&state.pool, &auth.actor(), params.is_read).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread/count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = dispatcher::unread_count(&state.pool, &auth.actor()).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// PUT /api/v1/notifications/read-all
///
/// Returns the number of notifications that changed state.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = dispatcher::mark_all_read(&state.pool, &auth.actor()).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// PUT /api/v1/notifications/{id}/read
///
/// Marking an already-read notification succeeds and returns it unchanged.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = dispatcher::mark_read(&state.pool, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: notification }))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    dispatcher::delete(&state.pool, &auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/stream
///
/// Server-sent events carrying the caller's new notifications as they are
/// committed. Clients that prefer polling can ignore this endpoint.
pub async fn stream(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = auth.user_id;
    tracing::debug!(user_id, "Notification stream opened");

    let events = BroadcastStream::new(state.event_bus.subscribe()).filter_map(move |received| {
        match received {
            Ok(event) if event.recipient() == user_id => Event::default()
                .event("notification")
                .json_data(&event)
                .ok()
                .map(Ok),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(user_id, skipped, "Notification stream lagged");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
