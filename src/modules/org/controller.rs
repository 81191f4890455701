use crate::middleware::auth::IsEmployee;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::org::service::OrgService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use brs_core::AppError;
use brs_models::ids::{DepartmentId, DivisionId, EducationDepartmentId, InstituteId};
use brs_models::org::{
    CreateDepartmentDto, CreateDivisionDto, CreateEducationDepartmentDto, CreateInstituteDto,
    Department, Division, EducationDepartment, Institute, UpdateDepartmentDto, UpdateDivisionDto,
    UpdateEducationDepartmentDto, UpdateInstituteDto,
};
use brs_models::users::UserSummary;
use tracing::instrument;

/// List institutes
#[utoipa::path(
    get,
    path = "/api/institutes",
    responses(
        (status = 200, description = "All institutes", body = Vec<Institute>)
    ),
    tag = "Institutes"
)]
#[instrument(skip(state))]
pub async fn get_institutes(State(state): State<AppState>) -> Result<Json<Vec<Institute>>, AppError> {
    let institutes = OrgService::list_institutes(&state.db).await?;
    Ok(Json(institutes))
}

/// Get an institute
#[utoipa::path(
    get,
    path = "/api/institutes/{id}",
    params(("id" = i64, Path, description = "Institute ID")),
    responses(
        (status = 200, description = "Institute", body = Institute),
        (status = 404, description = "Institute not found", body = ErrorResponse)
    ),
    tag = "Institutes"
)]
#[instrument(skip(state))]
pub async fn get_institute(
    State(state): State<AppState>,
    Path(id): Path<InstituteId>,
) -> Result<Json<Institute>, AppError> {
    let institute = OrgService::get_institute(&state.db, id).await?;
    Ok(Json(institute))
}

/// List the departments of an institute
#[utoipa::path(
    get,
    path = "/api/institutes/{id}/departments",
    params(("id" = i64, Path, description = "Institute ID")),
    responses(
        (status = 200, description = "Departments of the institute", body = Vec<Department>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an employee", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Institutes"
)]
#[instrument(skip(state, _employee))]
pub async fn get_institute_departments(
    State(state): State<AppState>,
    _employee: IsEmployee,
    Path(id): Path<InstituteId>,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments = OrgService::institute_departments(&state.db, id).await?;
    Ok(Json(departments))
}

/// List the education departments of an institute
#[utoipa::path(
    get,
    path = "/api/institutes/{id}/education-departments",
    params(("id" = i64, Path, description = "Institute ID")),
    responses(
        (status = 200, description = "Education departments of the institute", body = Vec<EducationDepartment>)
    ),
    tag = "Institutes"
)]
#[instrument(skip(state))]
pub async fn get_institute_education_departments(
    State(state): State<AppState>,
    Path(id): Path<InstituteId>,
) -> Result<Json<Vec<EducationDepartment>>, AppError> {
    let departments = OrgService::institute_education_departments(&state.db, id).await?;
    Ok(Json(departments))
}

/// List the employees of a department
#[utoipa::path(
    get,
    path = "/api/departments/{id}/users",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Employees working in the department", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an employee", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _employee))]
pub async fn get_department_users(
    State(state): State<AppState>,
    _employee: IsEmployee,
    Path(id): Path<DepartmentId>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = OrgService::department_users(&state.db, id).await?;
    Ok(Json(users))
}

/// List divisions
#[utoipa::path(
    get,
    path = "/api/admin/divisions",
    responses(
        (status = 200, description = "All divisions", body = Vec<Division>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn get_divisions(State(state): State<AppState>) -> Result<Json<Vec<Division>>, AppError> {
    let divisions = OrgService::list_divisions(&state.db).await?;
    Ok(Json(divisions))
}

/// Create an institute
#[utoipa::path(
    post,
    path = "/api/admin/institutes",
    request_body = CreateInstituteDto,
    responses(
        (status = 201, description = "Institute created", body = Institute),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn create_institute(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateInstituteDto>,
) -> Result<(StatusCode, Json<Institute>), AppError> {
    let institute = OrgService::create_institute(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(institute)))
}

/// Update an institute
#[utoipa::path(
    patch,
    path = "/api/admin/institutes/{id}",
    params(("id" = i64, Path, description = "Institute ID")),
    request_body = UpdateInstituteDto,
    responses(
        (status = 200, description = "Institute updated", body = Institute),
        (status = 404, description = "Institute not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn update_institute(
    State(state): State<AppState>,
    Path(id): Path<InstituteId>,
    ValidatedJson(dto): ValidatedJson<UpdateInstituteDto>,
) -> Result<Json<Institute>, AppError> {
    let institute = OrgService::update_institute(&state.db, id, dto).await?;
    Ok(Json(institute))
}

/// Delete an institute
#[utoipa::path(
    delete,
    path = "/api/admin/institutes/{id}",
    params(("id" = i64, Path, description = "Institute ID")),
    responses(
        (status = 204, description = "Institute deleted"),
        (status = 404, description = "Institute not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn delete_institute(
    State(state): State<AppState>,
    Path(id): Path<InstituteId>,
) -> Result<StatusCode, AppError> {
    OrgService::delete_institute(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a division
#[utoipa::path(
    post,
    path = "/api/admin/divisions",
    request_body = CreateDivisionDto,
    responses(
        (status = 201, description = "Division created", body = Division),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn create_division(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDivisionDto>,
) -> Result<(StatusCode, Json<Division>), AppError> {
    let division = OrgService::create_division(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(division)))
}

/// Update a division
#[utoipa::path(
    patch,
    path = "/api/admin/divisions/{id}",
    params(("id" = i64, Path, description = "Division ID")),
    request_body = UpdateDivisionDto,
    responses(
        (status = 200, description = "Division updated", body = Division),
        (status = 404, description = "Division not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn update_division(
    State(state): State<AppState>,
    Path(id): Path<DivisionId>,
    ValidatedJson(dto): ValidatedJson<UpdateDivisionDto>,
) -> Result<Json<Division>, AppError> {
    let division = OrgService::update_division(&state.db, id, dto).await?;
    Ok(Json(division))
}

/// Delete a division
#[utoipa::path(
    delete,
    path = "/api/admin/divisions/{id}",
    params(("id" = i64, Path, description = "Division ID")),
    responses(
        (status = 204, description = "Division deleted"),
        (status = 404, description = "Division not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn delete_division(
    State(state): State<AppState>,
    Path(id): Path<DivisionId>,
) -> Result<StatusCode, AppError> {
    OrgService::delete_division(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Referenced institute or division does not exist", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = OrgService::create_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update a department
#[utoipa::path(
    patch,
    path = "/api/admin/departments/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Referenced institute or division does not exist", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = OrgService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

/// Delete a department
#[utoipa::path(
    delete,
    path = "/api/admin/departments/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
) -> Result<StatusCode, AppError> {
    OrgService::delete_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create an education department
#[utoipa::path(
    post,
    path = "/api/admin/education-departments",
    request_body = CreateEducationDepartmentDto,
    responses(
        (status = 201, description = "Education department created", body = EducationDepartment),
        (status = 400, description = "Referenced institute does not exist", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn create_education_department(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateEducationDepartmentDto>,
) -> Result<(StatusCode, Json<EducationDepartment>), AppError> {
    let department = OrgService::create_education_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update an education department
#[utoipa::path(
    patch,
    path = "/api/admin/education-departments/{id}",
    params(("id" = i64, Path, description = "Education department ID")),
    request_body = UpdateEducationDepartmentDto,
    responses(
        (status = 200, description = "Education department updated", body = EducationDepartment),
        (status = 404, description = "Education department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn update_education_department(
    State(state): State<AppState>,
    Path(id): Path<EducationDepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateEducationDepartmentDto>,
) -> Result<Json<EducationDepartment>, AppError> {
    let department = OrgService::update_education_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

/// Delete an education department
#[utoipa::path(
    delete,
    path = "/api/admin/education-departments/{id}",
    params(("id" = i64, Path, description = "Education department ID")),
    responses(
        (status = 204, description = "Education department deleted"),
        (status = 404, description = "Education department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Organization"
)]
#[instrument(skip(state))]
pub async fn delete_education_department(
    State(state): State<AppState>,
    Path(id): Path<EducationDepartmentId>,
) -> Result<StatusCode, AppError> {
    OrgService::delete_education_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
