use axum::{Json, extract::State};
use brs_core::AppError;
use brs_models::roles::Role;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

use super::service;

/// Role names of the requester
///
/// Read from storage, so a role change shows up before the token is refreshed.
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Role names ordered by role id, plus `dumr` for DUMR staff", body = Vec<String>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_own_roles(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    let names = service::get_user_role_names(&state.db, auth_user.user_id()?).await?;
    Ok(Json(names))
}

#[utoipa::path(
    get,
    path = "/api/admin/roles",
    responses(
        (status = 200, description = "The role catalog", body = Vec<Role>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff access required", body = ErrorResponse)
    ),
    tag = "Admin: Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_role_catalog(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    let roles = service::get_role_catalog(&state.db).await?;
    Ok(Json(roles))
}
