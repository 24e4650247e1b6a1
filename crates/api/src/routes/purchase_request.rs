//! Route definitions for the `/purchase-requests` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use backoffice_core::attachment::MAX_ATTACHMENT_BYTES;

use crate::handlers::purchase_request;
use crate::state::AppState;

/// Headroom above the attachment cap for the text fields and multipart
/// framing, so an oversized file is refused by validation with a clear
/// message rather than by the transport limit.
const BODY_LIMIT_HEADROOM: usize = 256 * 1024;

/// Routes mounted at `/purchase-requests`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create (JSON or multipart)
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update (admin)
/// DELETE /{id}           -> delete (admin)
/// POST   /{id}/sign      -> sign
/// PUT    /{id}/status    -> set_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(purchase_request::list).post(purchase_request::create),
        )
        .route(
            "/{id}",
            get(purchase_request::get_by_id)
                .put(purchase_request::update)
                .delete(purchase_request::delete),
        )
        .route("/{id}/sign", post(purchase_request::sign))
        .route("/{id}/status", put(purchase_request::set_status))
        .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_BYTES + BODY_LIMIT_HEADROOM))
}
