//! Route definitions for the `/invoices` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::invoice;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// PUT    /{id}/status    -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list).post(invoice::create))
        .route(
            "/{id}",
            get(invoice::get_by_id)
                .put(invoice::update)
                .delete(invoice::delete),
        )
        .route("/{id}/status", put(invoice::set_status))
}
