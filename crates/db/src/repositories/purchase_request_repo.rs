//! Repository for the `purchase_requests` table.

use backoffice_core::purchase::LegacyStatus;
use backoffice_core::sequence::{next_ordinal, MAX_ALLOCATION_ATTEMPTS, NO_URUT_LOCK_KEY};
use backoffice_core::types::DbId;
use backoffice_core::workflow::WorkflowPatch;
use sqlx::PgPool;

use crate::models::purchase_request::{
    NewPurchaseRequest, PurchaseRequest, PurchaseRequestFilter, UpdatePurchaseRequest,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, request_id, no_urut, requester, position, items, amount, file_url, \
                        status, workflow_status, \
                        admin_validated, admin_validated_at, admin_validator, \
                        approval_leader_signed, approval_leader_signed_at, approval_leader_id, \
                        nom_signed, nom_signed_at, nom_id, \
                        sm_signed, sm_signed_at, sm_id, \
                        created_at, updated_at";

/// Unique constraint backing the sequence number.
pub const NO_URUT_CONSTRAINT: &str = "uq_purchase_requests_no_urut";

/// Provides CRUD and workflow operations for purchase requests.
pub struct PurchaseRequestRepo;

impl PurchaseRequestRepo {
    /// Insert a new request with the next free `no_urut`.
    ///
    /// Allocation and insert run in one transaction holding a
    /// transaction-scoped advisory lock, so concurrent submissions are
    /// serialized. A collision on the unique constraint (only possible if a
    /// writer bypassed the lock) is retried a bounded number of times.
    pub async fn create(
        pool: &PgPool,
        input: &NewPurchaseRequest,
    ) -> Result<PurchaseRequest, sqlx::Error> {
        let mut attempt = 1;
        loop {
            match Self::insert_with_next_ordinal(pool, input).await {
                Err(sqlx::Error::Database(db_err))
                    if attempt < MAX_ALLOCATION_ATTEMPTS
                        && db_err.constraint() == Some(NO_URUT_CONSTRAINT) =>
                {
                    tracing::warn!(attempt, "no_urut collision, retrying allocation");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn insert_with_next_ordinal(
        pool: &PgPool,
        input: &NewPurchaseRequest,
    ) -> Result<PurchaseRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(NO_URUT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let current_max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(no_urut) FROM purchase_requests")
                .fetch_one(&mut *tx)
                .await?;

        let query = format!(
            "INSERT INTO purchase_requests
                (request_id, no_urut, requester, position, items, amount, file_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(&input.request_id)
            .bind(next_ordinal(current_max))
            .bind(&input.requester)
            .bind(&input.position)
            .bind(&input.items)
            .bind(input.amount)
            .bind(&input.file_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchase_requests WHERE id = $1");
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests oldest first, optionally filtered by either status field.
    pub async fn list(
        pool: &PgPool,
        filter: &PurchaseRequestFilter,
    ) -> Result<Vec<PurchaseRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchase_requests
             WHERE ($1::TEXT IS NULL OR workflow_status = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(filter.workflow_status.map(|s| s.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Edit the descriptive fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePurchaseRequest,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE purchase_requests SET
                requester = COALESCE($2, requester),
                position = COALESCE($3, position),
                items = COALESCE($4, items),
                amount = COALESCE($5, amount)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .bind(&input.requester)
            .bind(&input.position)
            .bind(&input.items)
            .bind(input.amount)
            .fetch_optional(pool)
            .await
    }

    /// Apply a workflow transition as a conditional write.
    ///
    /// The row is updated only while `workflow_status` still equals
    /// `patch.from` and the stage's flag is unset. Returns `None` when the
    /// row is missing or was advanced by someone else first.
    pub async fn apply_workflow_patch(
        pool: &PgPool,
        id: DbId,
        patch: &WorkflowPatch,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let cols = patch.columns();
        let query = format!(
            "UPDATE purchase_requests SET
                workflow_status = $3,
                {flag} = $4,
                {at} = $5,
                {actor} = $6
             WHERE id = $1
               AND workflow_status = $2
               AND {flag} IS NULL
             RETURNING {COLUMNS}",
            flag = cols.flag,
            at = cols.at,
            actor = cols.actor,
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .bind(patch.from.as_str())
            .bind(patch.to.as_str())
            .bind(patch.approved)
            .bind(patch.acted_at)
            .bind(patch.actor_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the legacy status. Leaves the workflow untouched.
    pub async fn set_legacy_status(
        pool: &PgPool,
        id: DbId,
        status: LegacyStatus,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE purchase_requests SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a request, returning the removed row so the caller can
    /// clean up its attachment.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!("DELETE FROM purchase_requests WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
