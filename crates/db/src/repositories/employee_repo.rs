//! Repository for the `employees` table.

use backoffice_core::payroll::EmployeeStatus;
use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{CreateEmployee, Employee, UpdateEmployee};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, position, salary, status, created_at, updated_at";

/// Provides CRUD and payroll-run operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee with status `Pending`.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (name, position, salary)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.name)
            .bind(&input.position)
            .bind(input.salary)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List employees, most recently added first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }

    /// Update an employee. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                name = COALESCE($2, name),
                position = COALESCE($3, position),
                salary = COALESCE($4, salary)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.position)
            .bind(input.salary)
            .fetch_optional(pool)
            .await
    }

    /// Mark one pending employee as processed.
    ///
    /// Returns `None` if the employee is missing or already processed.
    pub async fn process(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(EmployeeStatus::Processed.as_str())
            .bind(EmployeeStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark every pending employee as processed. Returns the number changed.
    pub async fn process_all_pending(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE employees SET status = $1 WHERE status = $2")
            .bind(EmployeeStatus::Processed.as_str())
            .bind(EmployeeStatus::Pending.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete an employee. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
