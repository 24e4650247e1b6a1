//! Handlers for the `/purchase-requests` resource.
//!
//! Submission accepts either JSON or a multipart form carrying an optional
//! attachment. Sign-off goes through [`backoffice_core::workflow::transition`]
//! and a conditional write; the role that acts is always the one the current
//! stage requires, taken from the caller's token.

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::attachment::{attachment_key, validate_attachment_size};
use backoffice_core::error::CoreError;
use backoffice_core::purchase::{generate_request_id, validate_request_fields};
use backoffice_core::roles::Role;
use backoffice_core::types::{Amount, DbId};
use backoffice_core::workflow::{actionable_role, transition, Decision, TransitionError};
use backoffice_db::models::purchase_request::{
    CreatePurchaseRequest, NewPurchaseRequest, PurchaseRequest, PurchaseRequestFilter,
    SetLegacyStatus, SignPurchaseRequest, UpdatePurchaseRequest,
};
use backoffice_db::repositories::PurchaseRequestRepo;
use backoffice_events::{event_types, PlatformEvent};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "PurchaseRequest";

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

/// A purchase request plus the viewer-relative action hint.
#[derive(Debug, Serialize)]
pub struct PurchaseRequestView {
    #[serde(flatten)]
    pub request: PurchaseRequest,
    /// The role the viewer would sign with, or `null` when they cannot act.
    pub can_act: Option<Role>,
}

impl PurchaseRequestView {
    fn for_viewer(request: PurchaseRequest, viewer: &AuthUser) -> Self {
        let can_act = actionable_role(request.workflow_status, &viewer.roles);
        Self { request, can_act }
    }
}

/// An uploaded file taken from a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Body of `POST /purchase-requests`, either JSON or multipart.
#[derive(Debug)]
pub struct PurchaseSubmission {
    pub fields: CreatePurchaseRequest,
    pub file: Option<UploadedFile>,
}

impl FromRequest<AppState> for PurchaseSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(fields) = Json::<CreatePurchaseRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self { fields, file: None })
        }
    }
}

impl PurchaseSubmission {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut requester = None;
        let mut position = None;
        let mut items = None;
        let mut amount = None;
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or("attachment").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file part means "no attachment" (browsers send one
                // for an untouched file input).
                if !bytes.is_empty() {
                    file = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            match name.as_str() {
                "requester" => requester = Some(text),
                "position" => position = Some(text),
                "items" => items = Some(text),
                "amount" => {
                    let parsed: Amount = text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("amount must be a whole number, got '{text}'"))
                    })?;
                    amount = Some(parsed);
                }
                _ => {}
            }
        }

        let missing = |field: &str| AppError::BadRequest(format!("Missing required '{field}' field"));
        Ok(Self {
            fields: CreatePurchaseRequest {
                requester: requester.ok_or_else(|| missing("requester"))?,
                position: position.ok_or_else(|| missing("position"))?,
                items: items.ok_or_else(|| missing("items"))?,
                amount: amount.ok_or_else(|| missing("amount"))?,
            },
            file,
        })
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/purchase-requests?workflow_status=&status=
///
/// Oldest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<PurchaseRequestFilter>,
) -> AppResult<Json<DataResponse<Vec<PurchaseRequestView>>>> {
    let requests = PurchaseRequestRepo::list(&state.pool, &filter).await?;
    let views = requests
        .into_iter()
        .map(|r| PurchaseRequestView::for_viewer(r, &user))
        .collect();
    Ok(Json(DataResponse::new(views)))
}

/// GET /api/v1/purchase-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PurchaseRequestView>>> {
    let request = PurchaseRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(PurchaseRequestView::for_viewer(
        request, &user,
    ))))
}

/// POST /api/v1/purchase-requests
///
/// The attachment is written before the row. If the insert then fails the
/// object is deleted again and the insert error is returned.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    submission: PurchaseSubmission,
) -> AppResult<(StatusCode, Json<DataResponse<PurchaseRequestView>>)> {
    let PurchaseSubmission { fields, file } = submission;
    validate_request_fields(&fields.requester, &fields.position, &fields.items, fields.amount)?;
    if let Some(file) = &file {
        validate_attachment_size(file.bytes.len())?;
    }

    let request_id = generate_request_id();

    let mut stored_key = None;
    let mut file_url = None;
    if let Some(file) = &file {
        let key = attachment_key(&request_id, Utc::now().timestamp_millis(), &file.filename);
        file_url = Some(state.attachments.put(&key, &file.bytes).await?);
        stored_key = Some(key);
    }

    let input = NewPurchaseRequest {
        request_id,
        requester: fields.requester.trim().to_string(),
        position: fields.position.trim().to_string(),
        items: fields.items.trim().to_string(),
        amount: fields.amount,
        file_url,
    };

    let request = match PurchaseRequestRepo::create(&state.pool, &input).await {
        Ok(request) => request,
        Err(err) => {
            if let Some(key) = &stored_key {
                if let Err(cleanup) = state.attachments.delete(key).await {
                    tracing::error!(key, error = %cleanup, "Failed to remove orphaned attachment");
                }
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        id = request.id,
        request_id = %request.request_id,
        no_urut = request.no_urut,
        user_id = user.user_id,
        has_attachment = request.file_url.is_some(),
        "Purchase request submitted",
    );
    publish(&state, event_types::PURCHASE_REQUEST_CREATED, &request, user.user_id);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(PurchaseRequestView::for_viewer(
            request, &user,
        ))),
    ))
}

/// PUT /api/v1/purchase-requests/{id} (admin)
///
/// Edits requester, position, items and amount. Workflow fields and
/// `no_urut` are not editable here.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePurchaseRequest>,
) -> AppResult<Json<DataResponse<PurchaseRequestView>>> {
    let existing = PurchaseRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    validate_request_fields(
        input.requester.as_deref().unwrap_or(&existing.requester),
        input.position.as_deref().unwrap_or(&existing.position),
        input.items.as_deref().unwrap_or(&existing.items),
        input.amount.unwrap_or(existing.amount),
    )?;

    let trimmed = UpdatePurchaseRequest {
        requester: input.requester.map(|s| s.trim().to_string()),
        position: input.position.map(|s| s.trim().to_string()),
        items: input.items.map(|s| s.trim().to_string()),
        amount: input.amount,
    };
    let request = PurchaseRequestRepo::update(&state.pool, id, &trimmed)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, user_id = user.user_id, "Purchase request edited");
    publish(&state, event_types::PURCHASE_REQUEST_UPDATED, &request, user.user_id);

    Ok(Json(DataResponse::new(PurchaseRequestView::for_viewer(
        request, &user,
    ))))
}

/// DELETE /api/v1/purchase-requests/{id} (admin)
///
/// Removes the row, then its attachment. A failed attachment removal is
/// logged; the row is already gone.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = PurchaseRequestRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(key) = removed
        .file_url
        .as_deref()
        .and_then(|url| state.attachments.key_for_url(url))
    {
        if let Err(e) = state.attachments.delete(key).await {
            tracing::warn!(id, key, error = %e, "Failed to remove attachment of deleted request");
        }
    }

    tracing::info!(id, user_id = user.user_id, "Purchase request deleted");
    publish(&state, event_types::PURCHASE_REQUEST_DELETED, &removed, user.user_id);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/purchase-requests/{id}/sign
///
/// Approve or reject at the request's current stage. The caller must hold
/// the role that stage requires (403 otherwise). Terminal requests, and
/// requests advanced by someone else between read and write, answer 409.
pub async fn sign(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<SignPurchaseRequest>,
) -> AppResult<Json<DataResponse<PurchaseRequestView>>> {
    let current = PurchaseRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let status = current.workflow_status;

    let role = match status.required_role() {
        None => return Err(TransitionError::AlreadyFinal(status).into()),
        Some(required) if user.has_role(required) => required,
        Some(required) => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Role '{required}' is required to act on a request in {status}"
            ))));
        }
    };

    let decision = Decision::from_approve(input.approve);
    let patch = transition(status, role, decision, user.user_id, Utc::now())?;

    let updated = match PurchaseRequestRepo::apply_workflow_patch(&state.pool, id, &patch).await? {
        Some(updated) => updated,
        None => {
            if PurchaseRequestRepo::find_by_id(&state.pool, id).await?.is_none() {
                return Err(not_found(id));
            }
            tracing::info!(id, from = %patch.from, user_id = user.user_id, "Stale sign-off refused");
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Request is no longer in {}; reload and try again",
                patch.from
            ))));
        }
    };

    tracing::info!(
        id,
        user_id = user.user_id,
        role = %role,
        approved = patch.approved,
        from = %patch.from,
        to = %patch.to,
        "Purchase request signed",
    );
    publish(&state, event_types::PURCHASE_REQUEST_SIGNED, &updated, user.user_id);

    Ok(Json(DataResponse::new(PurchaseRequestView::for_viewer(
        updated, &user,
    ))))
}

/// PUT /api/v1/purchase-requests/{id}/status (admin)
///
/// Overwrites the legacy tri-state status. The workflow is not touched and
/// the two fields are not reconciled.
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetLegacyStatus>,
) -> AppResult<Json<DataResponse<PurchaseRequestView>>> {
    let request = PurchaseRequestRepo::set_legacy_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, user_id = user.user_id, status = %input.status, "Legacy status set");
    publish(
        &state,
        event_types::PURCHASE_REQUEST_STATUS_CHANGED,
        &request,
        user.user_id,
    );

    Ok(Json(DataResponse::new(PurchaseRequestView::for_viewer(
        request, &user,
    ))))
}

fn publish(state: &AppState, event_type: &str, request: &PurchaseRequest, actor: DbId) {
    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_source(event_types::ENTITY_PURCHASE_REQUEST, request.id)
            .with_actor(actor)
            .with_record(request),
    );
}
