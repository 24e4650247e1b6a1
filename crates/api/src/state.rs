use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::AttachmentStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: backoffice_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Change feed; every successful mutation publishes here.
    pub event_bus: Arc<backoffice_events::EventBus>,
    /// Object store for purchase-request attachments.
    pub attachments: Arc<dyn AttachmentStore>,
}
