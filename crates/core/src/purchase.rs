//! Purchase request constants, the legacy status field, and input validation.

use rand::Rng;

use crate::error::CoreError;
use crate::status::define_text_enum;
use crate::types::Amount;
use crate::validation::{require_non_empty, require_non_negative};

/// Prefix of the human-facing request code (`PR0042`).
pub const REQUEST_ID_PREFIX: &str = "PR";

define_text_enum! {
    /// Coarse tri-state status kept for simple listings.
    ///
    /// Independent of the approval workflow: it is overwritten directly and
    /// never derived from `workflow_status`.
    LegacyStatus("status") {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

/// Format a request code from a number in `0..10_000`.
pub fn format_request_id(n: u16) -> String {
    format!("{REQUEST_ID_PREFIX}{:04}", n % 10_000)
}

/// Generate a random request code. Codes are short and may collide; the
/// primary key and `no_urut` are the real identities.
pub fn generate_request_id() -> String {
    format_request_id(rand::rng().random_range(0..10_000))
}

/// Validate the user-supplied fields of a new or edited purchase request.
pub fn validate_request_fields(
    requester: &str,
    position: &str,
    items: &str,
    amount: Amount,
) -> Result<(), CoreError> {
    require_non_empty("requester", requester)?;
    require_non_empty("position", position)?;
    require_non_empty("items", items)?;
    require_non_negative("amount", amount)?;
    Ok(())
}
