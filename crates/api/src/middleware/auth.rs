//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use backoffice_core::error::CoreError;
use backoffice_core::roles::Role;
use backoffice_core::types::DbId;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Identity and roles are passed explicitly from here into handlers and on
/// into the domain functions; nothing reads them from ambient state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Decode a raw access token. Used directly by the WebSocket endpoint,
    /// which receives the token as a query parameter.
    pub fn from_token(token: &str, config: &JwtConfig) -> Result<Self, AppError> {
        let claims = validate_token(token, config).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;
        Ok(AuthUser {
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        AuthUser::from_token(token, &state.config.jwt)
    }
}
