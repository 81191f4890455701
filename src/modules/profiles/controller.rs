use crate::middleware::auth::{AuthUser, IsEmployee};
use crate::middleware::role::is_staff;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::profiles::{
    PaginatedProfilesResponse, ProfileFilterParams, ProfileStats, UpdateUserProfileDto,
    UserProfileResponse,
};
use tracing::instrument;

/// Get the requester's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Own profile", body = UserProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Requester has no profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state))]
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile =
        ProfileService::get_profile(&state.db, auth_user.user_id()?, &state.media_config).await?;
    Ok(Json(profile))
}

/// Update the requester's profile
///
/// Omitted fields are kept and `null` clears a field, for both PUT and PATCH.
#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = UpdateUserProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserProfileResponse),
        (status = 400, description = "Referenced institute or department does not exist", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Requester has no profile", body = ErrorResponse),
        (status = 422, description = "Field too long", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateUserProfileDto>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile = ProfileService::update_profile(
        &state.db,
        auth_user.user_id()?,
        dto,
        &state.media_config,
    )
    .await?;
    Ok(Json(profile))
}

/// List profiles
#[utoipa::path(
    get,
    path = "/api/profiles",
    params(
        ("institute" = Option<i64>, Query, description = "Institute of the education department, ignored when department is set"),
        ("department" = Option<i64>, Query, description = "Education department ID"),
        ("name" = Option<String>, Query, description = "Case-insensitive part of the full name"),
        ("limit" = Option<i64>, Query, description = "Limit number of results"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination"),
        ("page" = Option<i64>, Query, description = "Page number, overrides offset")
    ),
    responses(
        (status = 200, description = "Profiles ordered by full name", body = PaginatedProfilesResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_profiles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    filters: Result<Query<ProfileFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedProfilesResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let profiles = ProfileService::list_profiles(&state.db, filters, &state.media_config).await?;
    Ok(Json(profiles))
}

/// Get the profile of a user
#[utoipa::path(
    get,
    path = "/api/profile/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile of the user", body = UserProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User has no profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile = ProfileService::get_profile(&state.db, user_id, &state.media_config).await?;
    Ok(Json(profile))
}

/// Profile completeness counters
///
/// Visible to staff only; other employees get 404.
#[utoipa::path(
    get,
    path = "/api/profiles-stats",
    responses(
        (status = 200, description = "Profile counters", body = ProfileStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an employee", body = ErrorResponse),
        (status = 404, description = "Not staff", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip_all)]
pub async fn get_profile_stats(
    State(state): State<AppState>,
    IsEmployee(employee): IsEmployee,
) -> Result<Json<ProfileStats>, AppError> {
    if !is_staff(&employee) {
        return Err(AppError::not_found(anyhow::anyhow!("Not found")));
    }

    let stats = ProfileService::stats(&state.db).await?;
    Ok(Json(stats))
}
