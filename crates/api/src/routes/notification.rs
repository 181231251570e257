//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                          -> list_notifications
/// GET    /unread/count              -> unread_count
/// PUT    /read-all                  -> mark_all_read
/// GET    /stream                    -> stream
/// DELETE /{id}                      -> delete_notification
/// PUT    /{id}/read                 -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/unread/count", get(notification::unread_count))
        .route("/read-all", put(notification::mark_all_read))
        .route("/stream", get(notification::stream))
        .route("/{id}", delete(notification::delete_notification))
        .route("/{id}/read", put(notification::mark_read))
}
