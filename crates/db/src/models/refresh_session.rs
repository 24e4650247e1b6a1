//! Refresh-token session row.

use backoffice_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One issued refresh token, identified by its digest.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    /// Set when the token is rotated or the user logs out.
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
