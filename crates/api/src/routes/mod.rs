pub mod auth;
pub mod health;
pub mod messages;
pub mod notification;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current profile
/// /auth/profile                       update profile (PUT)
/// /auth/password                      change password (PUT)
///
/// /requests                           list, create
/// /requests/stats/summary             status counts (admin only)
/// /requests/{id}                      get, update (admin), delete
///
/// /messages                           post
/// /messages/request/{request_id}      list for a ticket
///
/// /notifications                      list (?is_read=)
/// /notifications/unread/count         unread count
/// /notifications/read-all             mark all read (PUT)
/// /notifications/stream               server-sent events
/// /notifications/{id}                 delete
/// /notifications/{id}/read            mark read (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/requests", requests::router())
        .nest("/messages", messages::router())
        .nest("/notifications", notification::router())
}
