//! Handlers for the `/invoices` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::billing::{
    generate_invoice_id, validate_invoice_fields, validate_status_change,
};
use backoffice_core::error::CoreError;
use backoffice_core::types::DbId;
use backoffice_db::models::invoice::{
    CreateInvoice, Invoice, NewInvoice, SetInvoiceStatus, UpdateInvoice,
};
use backoffice_db::repositories::InvoiceRepo;
use backoffice_events::{event_types, PlatformEvent};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Invoice",
        id,
    })
}

fn publish(state: &AppState, event_type: &str, invoice: &Invoice, actor: DbId) {
    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_source(event_types::ENTITY_INVOICE, invoice.id)
            .with_actor(actor)
            .with_record(invoice),
    );
}

/// GET /api/v1/invoices
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    let invoices = InvoiceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(invoices)))
}

/// POST /api/v1/invoices
///
/// The due date may not lie in the past (UTC calendar day).
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    let today = Utc::now().date_naive();
    validate_invoice_fields(&input.client, input.amount, input.due_date, Some(today))?;

    let new = NewInvoice {
        invoice_id: generate_invoice_id(),
        client: input.client.trim().to_string(),
        amount: input.amount,
        due_date: input.due_date,
    };
    let invoice = InvoiceRepo::create(&state.pool, &new).await?;

    tracing::info!(
        id = invoice.id,
        invoice_id = %invoice.invoice_id,
        user_id = user.user_id,
        "Invoice created",
    );
    publish(&state, event_types::INVOICE_CREATED, &invoice, user.user_id);

    Ok((StatusCode::CREATED, Json(DataResponse::new(invoice))))
}

/// GET /api/v1/invoices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(invoice)))
}

/// PUT /api/v1/invoices/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let existing = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_invoice_fields(
        input.client.as_deref().unwrap_or(&existing.client),
        input.amount.unwrap_or(existing.amount),
        input.due_date.unwrap_or(existing.due_date),
        None,
    )?;

    let input = UpdateInvoice {
        client: input.client.map(|s| s.trim().to_string()),
        ..input
    };
    let invoice = InvoiceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, user_id = user.user_id, "Invoice updated");
    publish(&state, event_types::INVOICE_UPDATED, &invoice, user.user_id);

    Ok(Json(DataResponse::new(invoice)))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !InvoiceRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, user_id = user.user_id, "Invoice deleted");
    state.event_bus.publish(
        PlatformEvent::new(event_types::INVOICE_DELETED)
            .with_source(event_types::ENTITY_INVOICE, id)
            .with_actor(user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/invoices/{id}/status
///
/// Mark an invoice Paid or Overdue. A paid invoice can no longer change (409).
pub async fn set_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<SetInvoiceStatus>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let existing = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_status_change(existing.status, input.status)?;

    let invoice = InvoiceRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Invoice is already paid".into())))?;

    tracing::info!(
        id,
        user_id = user.user_id,
        from = %existing.status,
        to = %invoice.status,
        "Invoice status changed",
    );
    publish(&state, event_types::INVOICE_STATUS_CHANGED, &invoice, user.user_id);

    Ok(Json(DataResponse::new(invoice)))
}
