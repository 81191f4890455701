use crate::modules::auth::controller::ErrorResponse;
use crate::modules::catalogs::service::{Catalog, CatalogService};
use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use brs_core::AppError;
use brs_models::ids::{AcademicDegreeId, AcademicTitleId};
use brs_models::reference::{AcademicDegree, AcademicTitle, CatalogEntryDto};
use tracing::instrument;

/// List academic degrees
#[utoipa::path(
    get,
    path = "/api/admin/academic-degrees",
    responses(
        (status = 200, description = "Academic degrees ordered by name", body = Vec<AcademicDegree>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn get_academic_degrees(State(state): State<AppState>) -> Result<Json<Vec<AcademicDegree>>, AppError> {
    let entries = CatalogService::list(&state.db, Catalog::AcademicDegrees).await?;
    Ok(Json(entries))
}

/// Add an academic degree
#[utoipa::path(
    post,
    path = "/api/admin/academic-degrees",
    request_body = CatalogEntryDto,
    responses(
        (status = 201, description = "Entry created", body = AcademicDegree),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn create_academic_degree(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CatalogEntryDto>,
) -> Result<(StatusCode, Json<AcademicDegree>), AppError> {
    let entry = CatalogService::create(&state.db, Catalog::AcademicDegrees, &dto.name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Rename an academic degree
#[utoipa::path(
    patch,
    path = "/api/admin/academic-degrees/{id}",
    params(("id" = i64, Path, description = "Entry ID")),
    request_body = CatalogEntryDto,
    responses(
        (status = 200, description = "Entry renamed", body = AcademicDegree),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn update_academic_degree(
    State(state): State<AppState>,
    Path(id): Path<AcademicDegreeId>,
    ValidatedJson(dto): ValidatedJson<CatalogEntryDto>,
) -> Result<Json<AcademicDegree>, AppError> {
    let entry =
        CatalogService::rename(&state.db, Catalog::AcademicDegrees, id.into_inner(), &dto.name).await?;
    Ok(Json(entry))
}

/// Delete an academic degree
#[utoipa::path(
    delete,
    path = "/api/admin/academic-degrees/{id}",
    params(("id" = i64, Path, description = "Entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn delete_academic_degree(
    State(state): State<AppState>,
    Path(id): Path<AcademicDegreeId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete(&state.db, Catalog::AcademicDegrees, id.into_inner()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List academic titles
#[utoipa::path(
    get,
    path = "/api/admin/academic-titles",
    responses(
        (status = 200, description = "Academic titles ordered by name", body = Vec<AcademicTitle>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn get_academic_titles(State(state): State<AppState>) -> Result<Json<Vec<AcademicTitle>>, AppError> {
    let entries = CatalogService::list(&state.db, Catalog::AcademicTitles).await?;
    Ok(Json(entries))
}

/// Add an academic title
#[utoipa::path(
    post,
    path = "/api/admin/academic-titles",
    request_body = CatalogEntryDto,
    responses(
        (status = 201, description = "Entry created", body = AcademicTitle),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn create_academic_title(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CatalogEntryDto>,
) -> Result<(StatusCode, Json<AcademicTitle>), AppError> {
    let entry = CatalogService::create(&state.db, Catalog::AcademicTitles, &dto.name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Rename an academic title
#[utoipa::path(
    patch,
    path = "/api/admin/academic-titles/{id}",
    params(("id" = i64, Path, description = "Entry ID")),
    request_body = CatalogEntryDto,
    responses(
        (status = 200, description = "Entry renamed", body = AcademicTitle),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn update_academic_title(
    State(state): State<AppState>,
    Path(id): Path<AcademicTitleId>,
    ValidatedJson(dto): ValidatedJson<CatalogEntryDto>,
) -> Result<Json<AcademicTitle>, AppError> {
    let entry =
        CatalogService::rename(&state.db, Catalog::AcademicTitles, id.into_inner(), &dto.name).await?;
    Ok(Json(entry))
}

/// Delete an academic title
#[utoipa::path(
    delete,
    path = "/api/admin/academic-titles/{id}",
    params(("id" = i64, Path, description = "Entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin: Reference data"
)]
#[instrument(skip(state))]
pub async fn delete_academic_title(
    State(state): State<AppState>,
    Path(id): Path<AcademicTitleId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete(&state.db, Catalog::AcademicTitles, id.into_inner()).await?;
    Ok(StatusCode::NO_CONTENT)
}
