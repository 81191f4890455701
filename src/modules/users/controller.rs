use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::{RoleChange, UserService};
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::roles::RoleKind;
use brs_models::users::{
    CreateUserDto, PaginatedUsersResponse, RolesDto, UpdateUserDto, UserFilterParams,
    UserWithRoles,
};
use tracing::instrument;

/// Create a user
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created, profiles synchronised with roles", body = UserWithRoles),
        (status = 400, description = "Duplicate username or Telegram id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff access required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserWithRoles>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on username or name parts"),
        ("role" = Option<String>, Query, description = "Role name, e.g. teacher"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("limit" = Option<i64>, Query, description = "Limit number of results"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination"),
        ("page" = Option<i64>, Query, description = "Page number, overrides offset")
    ),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsersResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    filters: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let users = UserService::list_users(&state.db, filters).await?;
    Ok(Json(users))
}

/// Get a user with roles
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with roles and profile flags", body = UserWithRoles),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserWithRoles>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserWithRoles),
        (status = 400, description = "Telegram id already linked", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserWithRoles>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(user))
}

/// Replace the role set of a user
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/roles",
    params(("id" = i64, Path, description = "User ID")),
    request_body = RolesDto,
    responses(
        (status = 200, description = "Roles replaced, profiles synchronised", body = UserWithRoles),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn replace_user_roles(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(dto): Json<RolesDto>,
) -> Result<Json<UserWithRoles>, AppError> {
    let user = UserService::change_roles(&state.db, id, RoleChange::Replace(dto.roles)).await?;
    Ok(Json(user))
}

/// Add roles to a user
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/roles",
    params(("id" = i64, Path, description = "User ID")),
    request_body = RolesDto,
    responses(
        (status = 200, description = "Roles added, profiles synchronised", body = UserWithRoles),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn add_user_roles(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(dto): Json<RolesDto>,
) -> Result<Json<UserWithRoles>, AppError> {
    let user = UserService::change_roles(&state.db, id, RoleChange::Add(dto.roles)).await?;
    Ok(Json(user))
}

/// Remove every role of a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}/roles",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Roles cleared, profiles removed", body = UserWithRoles),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn clear_user_roles(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserWithRoles>, AppError> {
    let user = UserService::change_roles(&state.db, id, RoleChange::Clear).await?;
    Ok(Json(user))
}

/// Remove one role from a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}/roles/{role}",
    params(
        ("id" = i64, Path, description = "User ID"),
        ("role" = String, Path, description = "Role name, e.g. student")
    ),
    responses(
        (status = 200, description = "Role removed, profiles synchronised", body = UserWithRoles),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Users"
)]
#[instrument(skip(state))]
pub async fn remove_user_role(
    State(state): State<AppState>,
    Path((id, role)): Path<(UserId, String)>,
) -> Result<Json<UserWithRoles>, AppError> {
    let role = role
        .parse::<RoleKind>()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;
    let user = UserService::change_roles(&state.db, id, RoleChange::Remove(vec![role])).await?;
    Ok(Json(user))
}
