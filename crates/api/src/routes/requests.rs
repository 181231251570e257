//! Route definitions for the `/requests` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /                          -> list_requests
/// POST   /                          -> create_request
/// GET    /stats/summary             -> get_stats
/// GET    /{id}                      -> get_request
/// PUT    /{id}                      -> update_request
/// DELETE /{id}                      -> delete_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/stats/summary", get(requests::get_stats))
        .route(
            "/{id}",
            get(requests::get_request)
                .put(requests::update_request)
                .delete(requests::delete_request),
        )
}
