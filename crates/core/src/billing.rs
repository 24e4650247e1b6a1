//! Invoice status, display codes, and validation.

use chrono::NaiveDate;
use rand::Rng;

use crate::error::CoreError;
use crate::status::define_text_enum;
use crate::types::Amount;
use crate::validation::{require_non_empty, require_positive};

/// Prefix of the human-facing invoice code (`INV0042`).
pub const INVOICE_ID_PREFIX: &str = "INV";

define_text_enum! {
    /// Payment state of an invoice.
    InvoiceStatus("invoice status") {
        Pending => "Pending",
        Paid => "Paid",
        Overdue => "Overdue",
    }
}

/// Generate a random invoice code.
pub fn generate_invoice_id() -> String {
    let n: u16 = rand::rng().random_range(0..10_000);
    format!("{INVOICE_ID_PREFIX}{n:04}")
}

/// Validate the fields of an invoice.
///
/// `today` is passed in so the due-date rule stays deterministic in tests.
/// The past-date check only applies on creation; edits may keep an
/// already-elapsed due date.
pub fn validate_invoice_fields(
    client: &str,
    amount: Amount,
    due_date: NaiveDate,
    today: Option<NaiveDate>,
) -> Result<(), CoreError> {
    require_non_empty("client", client)?;
    require_positive("amount", amount)?;
    if let Some(today) = today {
        if due_date < today {
            return Err(CoreError::Validation(format!(
                "due_date {due_date} is in the past"
            )));
        }
    }
    Ok(())
}

/// Check that an invoice in `current` may be marked `target`.
///
/// Only `Paid` and `Overdue` are settable, and a paid invoice is final.
pub fn validate_status_change(
    current: InvoiceStatus,
    target: InvoiceStatus,
) -> Result<(), CoreError> {
    if target == InvoiceStatus::Pending {
        return Err(CoreError::Validation(
            "Invoice status can only be set to Paid or Overdue".into(),
        ));
    }
    if current == InvoiceStatus::Paid {
        return Err(CoreError::Conflict("Invoice is already paid".into()));
    }
    Ok(())
}
