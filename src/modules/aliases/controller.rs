use crate::modules::aliases::service::AliasService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::reference::{SetAliasDto, UserAlias};
use tracing::instrument;

/// List user aliases
#[utoipa::path(
    get,
    path = "/api/admin/aliases",
    responses(
        (status = 200, description = "Aliases ordered by alias", body = Vec<UserAlias>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn get_aliases(State(state): State<AppState>) -> Result<Json<Vec<UserAlias>>, AppError> {
    let aliases = AliasService::list_aliases(&state.db).await?;
    Ok(Json(aliases))
}

/// Get the alias of a user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/alias",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Alias", body = UserAlias),
        (status = 404, description = "User has no alias", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn get_user_alias(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserAlias>, AppError> {
    let alias = AliasService::get_alias(&state.db, id).await?;
    Ok(Json(alias))
}

/// Set or replace the alias of a user
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/alias",
    params(("id" = i64, Path, description = "User ID")),
    request_body = SetAliasDto,
    responses(
        (status = 200, description = "Alias stored", body = UserAlias),
        (status = 400, description = "Alias belongs to another user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn set_user_alias(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<SetAliasDto>,
) -> Result<Json<UserAlias>, AppError> {
    let alias = AliasService::set_alias(&state.db, id, &dto.alias).await?;
    Ok(Json(alias))
}

/// Remove the alias of a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}/alias",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Alias removed"),
        (status = 404, description = "User has no alias", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn delete_user_alias(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    AliasService::delete_alias(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
