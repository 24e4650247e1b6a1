//! Payroll employee model and DTOs.

use backoffice_core::payroll::EmployeeStatus;
use backoffice_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub position: String,
    pub salary: Amount,
    #[sqlx(try_from = "String")]
    pub status: EmployeeStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an employee to the payroll list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub position: String,
    pub salary: Amount,
}

/// DTO for editing an employee. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Amount>,
}

/// Result of a bulk payroll run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessAllResult {
    pub processed: u64,
}
