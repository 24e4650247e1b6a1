pub mod auth;
pub mod employee;
pub mod health;
pub mod invoice;
pub mod purchase_request;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws?token=                                       change feed (WebSocket)
///
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /purchase-requests                               list, submit
/// /purchase-requests/{id}                          get, edit (admin), delete (admin)
/// /purchase-requests/{id}/sign                     approve / reject current stage
/// /purchase-requests/{id}/status                   legacy status (admin)
///
/// /employees                                       list, create
/// /employees/process-all                           process every pending employee
/// /employees/{id}                                  get, update, delete
/// /employees/{id}/process                          process one employee
///
/// /invoices                                        list, create
/// /invoices/{id}                                   get, update, delete
/// /invoices/{id}/status                            mark Paid / Overdue
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/purchase-requests", purchase_request::router())
        .nest("/employees", employee::router())
        .nest("/invoices", invoice::router())
}
