//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose roles do not
//! meet the requirement. Workflow sign-off is gated per stage inside the
//! sign handler instead, since the required role depends on the row.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use backoffice_core::error::CoreError;
use backoffice_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_role(Role::Admin) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires any authenticated user, whatever roles they hold.
///
/// Equivalent to [`AuthUser`], named for route handlers where "this needs a
/// session" should read explicitly.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
