use crate::modules::auth::controller::ErrorResponse;
use crate::modules::brs_admins::service::BrsAdminService;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::profiles::{BrsAdminProfile, UpdateBrsAdminProfileDto};
use tracing::instrument;

/// Get a BRS admin profile
#[utoipa::path(
    get,
    path = "/api/admin/brs-admins/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "BRS admin profile", body = BrsAdminProfile),
        (status = 404, description = "User has no BRS admin profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Profiles"
)]
#[instrument(skip(state))]
pub async fn get_brs_admin(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<BrsAdminProfile>, AppError> {
    let profile = BrsAdminService::get_brs_admin(&state.db, user_id).await?;
    Ok(Json(profile))
}

/// Set the institute of a BRS admin
#[utoipa::path(
    patch,
    path = "/api/admin/brs-admins/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = UpdateBrsAdminProfileDto,
    responses(
        (status = 200, description = "BRS admin profile updated", body = BrsAdminProfile),
        (status = 400, description = "Institute does not exist", body = ErrorResponse),
        (status = 404, description = "User has no BRS admin profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Profiles"
)]
#[instrument(skip(state))]
pub async fn update_brs_admin(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(dto): Json<UpdateBrsAdminProfileDto>,
) -> Result<Json<BrsAdminProfile>, AppError> {
    let profile = BrsAdminService::update_brs_admin(&state.db, user_id, dto).await?;
    Ok(Json(profile))
}
