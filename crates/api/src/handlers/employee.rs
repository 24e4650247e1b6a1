//! Handlers for the `/employees` resource (payroll list).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::error::CoreError;
use backoffice_core::payroll::{ensure_processable, validate_employee_fields};
use backoffice_core::types::DbId;
use backoffice_db::models::employee::{
    CreateEmployee, Employee, ProcessAllResult, UpdateEmployee,
};
use backoffice_db::repositories::EmployeeRepo;
use backoffice_events::{event_types, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Employee",
        id,
    })
}

fn publish(state: &AppState, event_type: &str, employee: &Employee, actor: DbId) {
    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_source(event_types::ENTITY_EMPLOYEE, employee.id)
            .with_actor(actor)
            .with_record(employee),
    );
}

/// GET /api/v1/employees
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Employee>>>> {
    let employees = EmployeeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(employees)))
}

/// POST /api/v1/employees
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<DataResponse<Employee>>)> {
    validate_employee_fields(&input.name, &input.position, input.salary)?;
    let input = CreateEmployee {
        name: input.name.trim().to_string(),
        position: input.position.trim().to_string(),
        salary: input.salary,
    };

    let employee = EmployeeRepo::create(&state.pool, &input).await?;
    tracing::info!(id = employee.id, user_id = user.user_id, "Employee added");
    publish(&state, event_types::EMPLOYEE_CREATED, &employee, user.user_id);

    Ok((StatusCode::CREATED, Json(DataResponse::new(employee))))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Employee>>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(employee)))
}

/// PUT /api/v1/employees/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<DataResponse<Employee>>> {
    let existing = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_employee_fields(
        input.name.as_deref().unwrap_or(&existing.name),
        input.position.as_deref().unwrap_or(&existing.position),
        input.salary.unwrap_or(existing.salary),
    )?;

    let input = UpdateEmployee {
        name: input.name.map(|s| s.trim().to_string()),
        position: input.position.map(|s| s.trim().to_string()),
        salary: input.salary,
    };
    let employee = EmployeeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, user_id = user.user_id, "Employee updated");
    publish(&state, event_types::EMPLOYEE_UPDATED, &employee, user.user_id);

    Ok(Json(DataResponse::new(employee)))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EmployeeRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = user.user_id, "Employee deleted");
    state.event_bus.publish(
        PlatformEvent::new(event_types::EMPLOYEE_DELETED)
            .with_source(event_types::ENTITY_EMPLOYEE, id)
            .with_actor(user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/employees/{id}/process
///
/// Marks one employee's payroll as processed. 409 if it already was.
pub async fn process(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Employee>>> {
    let existing = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_processable(existing.status)?;

    // The write is conditional on Pending; losing a race reads as a conflict.
    let employee = EmployeeRepo::process(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Payroll already processed for this employee".into(),
        ))
    })?;

    tracing::info!(id, user_id = user.user_id, "Payroll processed");
    publish(&state, event_types::EMPLOYEE_PROCESSED, &employee, user.user_id);

    Ok(Json(DataResponse::new(employee)))
}

/// POST /api/v1/employees/process-all
///
/// Marks every pending employee as processed and returns how many changed.
pub async fn process_all(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<ProcessAllResult>>> {
    let processed = EmployeeRepo::process_all_pending(&state.pool).await?;

    tracing::info!(processed, user_id = user.user_id, "Payroll run for all pending employees");
    state.event_bus.publish(
        PlatformEvent::new(event_types::EMPLOYEES_PROCESSED_ALL)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "processed": processed })),
    );

    Ok(Json(DataResponse::new(ProcessAllResult { processed })))
}
