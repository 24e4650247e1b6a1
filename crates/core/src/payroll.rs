//! Employee payroll status and validation.

use crate::error::CoreError;
use crate::status::define_text_enum;
use crate::types::Amount;
use crate::validation::{require_non_empty, require_non_negative};

define_text_enum! {
    /// Whether an employee's payroll has been run for the current period.
    EmployeeStatus("employee status") {
        Pending => "Pending",
        Processed => "Processed",
    }
}

/// Validate the user-supplied fields of an employee record.
pub fn validate_employee_fields(
    name: &str,
    position: &str,
    salary: Amount,
) -> Result<(), CoreError> {
    require_non_empty("name", name)?;
    require_non_empty("position", position)?;
    require_non_negative("salary", salary)?;
    Ok(())
}

/// Ensure payroll has not already been processed for this employee.
pub fn ensure_processable(status: EmployeeStatus) -> Result<(), CoreError> {
    match status {
        EmployeeStatus::Pending => Ok(()),
        EmployeeStatus::Processed => Err(CoreError::Conflict(
            "Payroll already processed for this employee".into(),
        )),
    }
}
