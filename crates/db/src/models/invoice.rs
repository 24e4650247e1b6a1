//! Invoice model and DTOs.

use backoffice_core::billing::InvoiceStatus;
use backoffice_core::types::{Amount, DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `invoices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub invoice_id: String,
    pub client: String,
    pub amount: Amount,
    pub due_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub client: String,
    pub amount: Amount,
    pub due_date: NaiveDate,
}

/// Fully-resolved insert including the generated invoice code.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_id: String,
    pub client: String,
    pub amount: Amount,
    pub due_date: NaiveDate,
}

/// DTO for editing an invoice. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoice {
    pub client: Option<String>,
    pub amount: Option<Amount>,
    pub due_date: Option<NaiveDate>,
}

/// Body of a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct SetInvoiceStatus {
    pub status: InvoiceStatus,
}
