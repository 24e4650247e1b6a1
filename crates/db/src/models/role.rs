//! Role lookup row.

use backoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the seeded `roles` table.
///
/// Named `RoleRow` to keep it apart from the closed
/// [`backoffice_core::roles::Role`] enum that the rest of the service uses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
