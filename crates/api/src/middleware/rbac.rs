//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthAdmin`] and rejects requests whose role does
//! not meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hrdocs_core::error::CoreError;
use hrdocs_core::roles::VALID_ROLES;

use super::auth::AuthAdmin;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `super_admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn super_only(RequireSuperAdmin(admin): RequireSuperAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSuperAdmin(pub AuthAdmin);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = AuthAdmin::from_request_parts(parts, state).await?;
        if !admin.is_super_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Super admin role required".into(),
            )));
        }
        Ok(RequireSuperAdmin(admin))
    }
}

/// Requires any HR admin role. Tokens carrying an unknown role are refused.
pub struct RequireAdmin(pub AuthAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = AuthAdmin::from_request_parts(parts, state).await?;
        if !VALID_ROLES.contains(&admin.role.as_str()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "HR admin role required".into(),
            )));
        }
        Ok(RequireAdmin(admin))
    }
}
