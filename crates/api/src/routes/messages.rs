//! Route definitions for the `/messages` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// POST   /                          -> post_message
/// GET    /request/{request_id}      -> list_for_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::post_message))
        .route("/request/{request_id}", get(messages::list_for_request))
}
