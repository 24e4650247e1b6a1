//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::error::CoreError;
use backoffice_core::roles::Role;
use backoffice_db::models::user::{User, UserResponse};
use backoffice_db::repositories::{RefreshSessionRepo, RoleRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        let updated =
            UserRepo::record_login_failure(&state.pool, user.id, MAX_FAILED_ATTEMPTS, lock_until)
                .await?;
        if updated.is_some_and(|u| u.failed_login_count >= MAX_FAILED_ATTEMPTS) {
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    UserRepo::record_login_success(&state.pool, user.id).await?;

    let roles = RoleRepo::roles_for_user(&state.pool, user.id).await?;
    let response = create_auth_response(&state, &user, roles).await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a live refresh token for a new token pair. The old token is
/// spent in the same statement that finds it (rotation) and roles are re-read, so role changes take effect on
/// the next refresh.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = RefreshSessionRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let roles = RoleRepo::roles_for_user(&state.pool, user.id).await?;
    let response = create_auth_response(&state, &user, roles).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = RefreshSessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The caller's profile with roles as currently stored.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    let roles = RoleRepo::roles_for_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse::new(UserResponse::from_user(&user, roles))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    roles: Vec<Role>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &roles, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    RefreshSessionRepo::issue(&state.pool, user.id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from_user(user, roles),
    })
}
