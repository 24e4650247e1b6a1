//! Repository for the `invoices` table.

use backoffice_core::billing::InvoiceStatus;
use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::invoice::{Invoice, NewInvoice, UpdateInvoice};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, invoice_id, client, amount, due_date, status, created_at, updated_at";

/// Provides CRUD and status operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a new invoice with status `Pending`.
    pub async fn create(pool: &PgPool, input: &NewInvoice) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices (invoice_id, client, amount, due_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(&input.invoice_id)
            .bind(&input.client)
            .bind(input.amount)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find an invoice by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List invoices, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Invoice>(&query).fetch_all(pool).await
    }

    /// Update an invoice. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                client = COALESCE($2, client),
                amount = COALESCE($3, amount),
                due_date = COALESCE($4, due_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(&input.client)
            .bind(input.amount)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Change the status of an invoice that is not yet paid.
    ///
    /// Returns `None` if the invoice is missing or already `Paid`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET status = $2
             WHERE id = $1 AND status <> $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(InvoiceStatus::Paid.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an invoice. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
