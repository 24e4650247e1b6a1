//! Route definitions for the `/employees` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /process-all    -> process_all
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/process   -> process
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list).post(employee::create))
        .route("/process-all", post(employee::process_all))
        .route(
            "/{id}",
            get(employee::get_by_id)
                .put(employee::update)
                .delete(employee::delete),
        )
        .route("/{id}/process", post(employee::process))
}
