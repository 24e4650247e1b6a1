//! Purchase request entity model and DTOs.

use backoffice_core::purchase::LegacyStatus;
use backoffice_core::types::{Amount, DbId, Timestamp};
use backoffice_core::workflow::WorkflowStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `purchase_requests` table.
///
/// Each approval stage owns an audit triple (flag, timestamp, actor). The
/// flag stays `NULL` until that stage's role acts, then holds the decision.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseRequest {
    pub id: DbId,
    pub request_id: String,
    pub no_urut: i64,
    pub requester: String,
    pub position: String,
    pub items: String,
    pub amount: Amount,
    pub file_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: LegacyStatus,
    #[sqlx(try_from = "String")]
    pub workflow_status: WorkflowStatus,

    pub admin_validated: Option<bool>,
    pub admin_validated_at: Option<Timestamp>,
    pub admin_validator: Option<DbId>,

    pub approval_leader_signed: Option<bool>,
    pub approval_leader_signed_at: Option<Timestamp>,
    pub approval_leader_id: Option<DbId>,

    pub nom_signed: Option<bool>,
    pub nom_signed_at: Option<Timestamp>,
    pub nom_id: Option<DbId>,

    pub sm_signed: Option<bool>,
    pub sm_signed_at: Option<Timestamp>,
    pub sm_id: Option<DbId>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for submitting a new purchase request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseRequest {
    pub requester: String,
    pub position: String,
    pub items: String,
    pub amount: Amount,
}

/// Fully-resolved insert: the submitted fields plus the generated request
/// code and optional attachment URL. `no_urut` is allocated by the
/// repository.
#[derive(Debug, Clone)]
pub struct NewPurchaseRequest {
    pub request_id: String,
    pub requester: String,
    pub position: String,
    pub items: String,
    pub amount: Amount,
    pub file_url: Option<String>,
}

/// DTO for editing a purchase request. All fields are optional.
///
/// Workflow fields are deliberately absent; they only change through
/// the sign-off path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePurchaseRequest {
    pub requester: Option<String>,
    pub position: Option<String>,
    pub items: Option<String>,
    pub amount: Option<Amount>,
}

/// Body of a sign-off action.
#[derive(Debug, Clone, Deserialize)]
pub struct SignPurchaseRequest {
    pub approve: bool,
}

/// Body of a legacy status overwrite.
#[derive(Debug, Clone, Deserialize)]
pub struct SetLegacyStatus {
    pub status: LegacyStatus,
}

/// Optional listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseRequestFilter {
    pub workflow_status: Option<WorkflowStatus>,
    pub status: Option<LegacyStatus>,
}
