use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::profiles::{StudentProfile, UpdateStudentProfileDto};
use tracing::instrument;

/// Get a student profile
#[utoipa::path(
    get,
    path = "/api/admin/students/{user_id}",
    params(("user_id" = i64, Path, description = "User ID of the student")),
    responses(
        (status = 200, description = "Student profile", body = StudentProfile),
        (status = 404, description = "User has no student profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Profiles"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<StudentProfile>, AppError> {
    let student = StudentService::get_student(&state.db, user_id).await?;
    Ok(Json(student))
}

/// Update a student profile
///
/// Moving the student to another group re-synchronises its grade sums and
/// journal logs with the disciplines of the new group.
#[utoipa::path(
    patch,
    path = "/api/admin/students/{user_id}",
    params(("user_id" = i64, Path, description = "User ID of the student")),
    request_body = UpdateStudentProfileDto,
    responses(
        (status = 200, description = "Student profile updated", body = StudentProfile),
        (status = 400, description = "Group does not exist", body = ErrorResponse),
        (status = 404, description = "User has no student profile", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Profiles"
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentProfileDto>,
) -> Result<Json<StudentProfile>, AppError> {
    let student = StudentService::update_student(&state.db, user_id, dto).await?;
    Ok(Json(student))
}
