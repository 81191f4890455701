use anyhow::Context;
use brs_core::AppError;
use brs_db::is_foreign_key_violation;
use brs_models::ids::{DepartmentId, DivisionId, EducationDepartmentId, InstituteId, UserId};
use brs_models::org::{
    CreateDepartmentDto, CreateDivisionDto, CreateEducationDepartmentDto, CreateInstituteDto,
    Department, Division, EducationDepartment, Institute, UpdateDepartmentDto, UpdateDivisionDto,
    UpdateEducationDepartmentDto, UpdateInstituteDto,
};
use brs_models::roles::RoleKind;
use brs_models::users::UserSummary;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};

const DEPARTMENT_COLUMNS: &str = "id, name, institute_id, division_id, allow_application";

fn not_found(what: &str) -> AppError {
    AppError::not_found(anyhow::anyhow!("{} not found", what))
}

/// Maps a write error on a row with foreign keys.
fn map_reference_error(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        warn!(error = %e, "Rejected write with unknown reference");
        return AppError::bad_request(anyhow::anyhow!("Referenced object does not exist"));
    }
    AppError::database(e)
}

#[derive(Debug, FromRow)]
struct DepartmentUserRow {
    id: UserId,
    username: String,
    first_name: String,
    middle_name: String,
    last_name: String,
    role_ids: Vec<i16>,
}

impl From<DepartmentUserRow> for UserSummary {
    fn from(row: DepartmentUserRow) -> Self {
        UserSummary {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            roles: row.role_ids.into_iter().filter_map(RoleKind::from_id).collect(),
        }
    }
}

pub struct OrgService;

impl OrgService {
    #[instrument(skip(db))]
    pub async fn list_institutes(db: &PgPool) -> Result<Vec<Institute>, AppError> {
        let institutes = sqlx::query_as::<_, Institute>(
            "SELECT id, name, unit FROM institutes ORDER BY id",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch institutes")
        .map_err(AppError::database)?;

        Ok(institutes)
    }

    #[instrument(skip(db))]
    pub async fn get_institute(db: &PgPool, id: InstituteId) -> Result<Institute, AppError> {
        sqlx::query_as::<_, Institute>("SELECT id, name, unit FROM institutes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| not_found("Institute"))
    }

    #[instrument(skip(db))]
    pub async fn institute_departments(
        db: &PgPool,
        id: InstituteId,
    ) -> Result<Vec<Department>, AppError> {
        let sql = format!(
            "SELECT {} FROM departments WHERE institute_id = $1 ORDER BY name, id",
            DEPARTMENT_COLUMNS
        );
        let departments = sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_all(db)
            .await
            .context("Failed to fetch departments")
            .map_err(AppError::database)?;

        Ok(departments)
    }

    #[instrument(skip(db))]
    pub async fn institute_education_departments(
        db: &PgPool,
        id: InstituteId,
    ) -> Result<Vec<EducationDepartment>, AppError> {
        let departments = sqlx::query_as::<_, EducationDepartment>(
            "SELECT id, name, institute_id FROM education_departments
             WHERE institute_id = $1 ORDER BY name, id",
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch education departments")
        .map_err(AppError::database)?;

        Ok(departments)
    }

    /// Employees whose user profile names `id` as work department.
    #[instrument(skip(db))]
    pub async fn department_users(
        db: &PgPool,
        id: DepartmentId,
    ) -> Result<Vec<UserSummary>, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(not_found("Department"));
        }

        let rows = sqlx::query_as::<_, DepartmentUserRow>(
            "SELECT u.id, u.username, u.first_name, u.middle_name, u.last_name,
                    ARRAY(SELECT ur.role_id FROM user_roles ur
                          WHERE ur.user_id = u.id ORDER BY ur.role_id) AS role_ids
             FROM users u
             JOIN user_profiles p ON p.user_id = u.id
             WHERE p.work_department_id = $1
               AND EXISTS(SELECT 1 FROM user_roles ur
                          WHERE ur.user_id = u.id AND ur.role_id = $2)
             ORDER BY u.middle_name, u.first_name, u.id",
        )
        .bind(id)
        .bind(RoleKind::Employee.id())
        .fetch_all(db)
        .await
        .context("Failed to fetch department users")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn list_divisions(db: &PgPool) -> Result<Vec<Division>, AppError> {
        let divisions = sqlx::query_as::<_, Division>("SELECT id, name FROM divisions ORDER BY name, id")
            .fetch_all(db)
            .await
            .context("Failed to fetch divisions")
            .map_err(AppError::database)?;

        Ok(divisions)
    }

    #[instrument(skip(db))]
    pub async fn create_institute(
        db: &PgPool,
        dto: CreateInstituteDto,
    ) -> Result<Institute, AppError> {
        let institute = sqlx::query_as::<_, Institute>(
            "INSERT INTO institutes (name, unit) VALUES ($1, $2) RETURNING id, name, unit",
        )
        .bind(&dto.name)
        .bind(dto.unit)
        .fetch_one(db)
        .await?;

        info!(institute.id = %institute.id, "Institute created");
        Ok(institute)
    }

    #[instrument(skip(db))]
    pub async fn update_institute(
        db: &PgPool,
        id: InstituteId,
        dto: UpdateInstituteDto,
    ) -> Result<Institute, AppError> {
        sqlx::query_as::<_, Institute>(
            "UPDATE institutes SET name = COALESCE($2, name), unit = COALESCE($3, unit)
             WHERE id = $1
             RETURNING id, name, unit",
        )
        .bind(id)
        .bind(dto.name)
        .bind(dto.unit)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| not_found("Institute"))
    }

    #[instrument(skip(db))]
    pub async fn delete_institute(db: &PgPool, id: InstituteId) -> Result<(), AppError> {
        Self::delete_row(db, "institutes", id.into_inner(), "Institute").await
    }

    #[instrument(skip(db))]
    pub async fn create_division(db: &PgPool, dto: CreateDivisionDto) -> Result<Division, AppError> {
        let division = sqlx::query_as::<_, Division>(
            "INSERT INTO divisions (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await?;

        info!(division.id = %division.id, "Division created");
        Ok(division)
    }

    #[instrument(skip(db))]
    pub async fn update_division(
        db: &PgPool,
        id: DivisionId,
        dto: UpdateDivisionDto,
    ) -> Result<Division, AppError> {
        sqlx::query_as::<_, Division>(
            "UPDATE divisions SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(dto.name)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| not_found("Division"))
    }

    #[instrument(skip(db))]
    pub async fn delete_division(db: &PgPool, id: DivisionId) -> Result<(), AppError> {
        Self::delete_row(db, "divisions", id.into_inner(), "Division").await
    }

    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let sql = format!(
            "INSERT INTO departments (name, institute_id, division_id, allow_application)
             VALUES ($1, $2, $3, $4) RETURNING {}",
            DEPARTMENT_COLUMNS
        );
        let department = sqlx::query_as::<_, Department>(&sql)
            .bind(&dto.name)
            .bind(dto.institute_id)
            .bind(dto.division_id)
            .bind(dto.allow_application)
            .fetch_one(db)
            .await
            .map_err(map_reference_error)?;

        info!(department.id = %department.id, "Department created");
        Ok(department)
    }

    /// Partial update; a `null` reference in the body clears it.
    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let sql = format!(
            "UPDATE departments SET
                name = COALESCE($2, name),
                institute_id = CASE WHEN $3 THEN $4 ELSE institute_id END,
                division_id = CASE WHEN $5 THEN $6 ELSE division_id END,
                allow_application = COALESCE($7, allow_application)
             WHERE id = $1
             RETURNING {}",
            DEPARTMENT_COLUMNS
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .bind(dto.name)
            .bind(dto.institute_id.is_some())
            .bind(dto.institute_id.flatten())
            .bind(dto.division_id.is_some())
            .bind(dto.division_id.flatten())
            .bind(dto.allow_application)
            .fetch_optional(db)
            .await
            .map_err(map_reference_error)?
            .ok_or_else(|| not_found("Department"))
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: DepartmentId) -> Result<(), AppError> {
        Self::delete_row(db, "departments", id.into_inner(), "Department").await
    }

    #[instrument(skip(db))]
    pub async fn create_education_department(
        db: &PgPool,
        dto: CreateEducationDepartmentDto,
    ) -> Result<EducationDepartment, AppError> {
        let department = sqlx::query_as::<_, EducationDepartment>(
            "INSERT INTO education_departments (name, institute_id)
             VALUES ($1, $2) RETURNING id, name, institute_id",
        )
        .bind(&dto.name)
        .bind(dto.institute_id)
        .fetch_one(db)
        .await
        .map_err(map_reference_error)?;

        info!(education_department.id = %department.id, "Education department created");
        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn update_education_department(
        db: &PgPool,
        id: EducationDepartmentId,
        dto: UpdateEducationDepartmentDto,
    ) -> Result<EducationDepartment, AppError> {
        sqlx::query_as::<_, EducationDepartment>(
            "UPDATE education_departments SET
                name = COALESCE($2, name),
                institute_id = CASE WHEN $3 THEN $4 ELSE institute_id END
             WHERE id = $1
             RETURNING id, name, institute_id",
        )
        .bind(id)
        .bind(dto.name)
        .bind(dto.institute_id.is_some())
        .bind(dto.institute_id.flatten())
        .fetch_optional(db)
        .await
        .map_err(map_reference_error)?
        .ok_or_else(|| not_found("Education department"))
    }

    #[instrument(skip(db))]
    pub async fn delete_education_department(
        db: &PgPool,
        id: EducationDepartmentId,
    ) -> Result<(), AppError> {
        Self::delete_row(db, "education_departments", id.into_inner(), "Education department")
            .await
    }

    async fn delete_row(db: &PgPool, table: &str, id: i64, what: &str) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(db)
            .await
            .map_err(map_reference_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found(what));
        }

        info!(table, id, "Row deleted");
        Ok(())
    }
}
