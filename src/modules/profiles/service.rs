use anyhow::Context;
use brs_config::MediaConfig;
use brs_core::{AppError, PaginationMeta};
use brs_models::ids::UserId;
use brs_models::profiles::{
    PaginatedProfilesResponse, ProfileFilterParams, ProfileStats, UpdateUserProfileDto,
    UserProfile, UserProfileResponse, UserProfileRow,
};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, instrument, warn};

use crate::middleware::role::ensure_owner;
use crate::modules::users::service::like_pattern;

const PROFILE_SELECT: &str = "SELECT p.id, p.user_id, u.middle_name, u.first_name, u.last_name,
        p.institute_id, p.photo, p.position, p.academic_degree, p.academic_title,
        p.short_bio, p.awards_achievements, p.professional_development, p.work_experience,
        wd.id AS wd_id, wd.name AS wd_name, wd.institute_id AS wd_institute_id,
        wd.division_id AS wd_division_id, wd.allow_application AS wd_allow_application,
        ed.id AS ed_id, ed.name AS ed_name, ed.institute_id AS ed_institute_id";

const PROFILE_FROM: &str = " FROM user_profiles p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN departments wd ON wd.id = p.work_department_id
    LEFT JOIN education_departments ed ON ed.id = p.education_department_id";

const PROFILE_FILTERS: &str = " WHERE ($1::bigint IS NULL OR ed.institute_id = $1)
    AND ($2::bigint IS NULL OR p.education_department_id = $2)
    AND ($3::text IS NULL
        OR CONCAT(u.middle_name, ' ', u.first_name, ' ', u.last_name) ILIKE $3)";

/// Blank text columns count as empty whether NULL or `''`.
const PROFILE_STATS: &str = "SELECT
        COUNT(*) AS users_count,
        COUNT(*) FILTER (WHERE COALESCE(academic_degree, '') = ''
            AND COALESCE(academic_title, '') = ''
            AND COALESCE(awards_achievements, '') = ''
            AND COALESCE(professional_development, '') = ''
            AND COALESCE(work_experience, '') = '') AS empty_any,
        COUNT(*) FILTER (WHERE COALESCE(academic_degree, '') = '') AS empty_academic_degree,
        COUNT(*) FILTER (WHERE COALESCE(academic_title, '') = '') AS empty_academic_title,
        COUNT(*) FILTER (WHERE COALESCE(short_bio, '') = '') AS empty_short_bio,
        COUNT(*) FILTER (WHERE COALESCE(awards_achievements, '') = '')
            AS empty_awards_achievements,
        COUNT(*) FILTER (WHERE COALESCE(professional_development, '') = '')
            AS empty_professional_development,
        COUNT(*) FILTER (WHERE COALESCE(work_experience, '') = '') AS empty_work_experience
    FROM user_profiles";

fn profile_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Profile not found"))
}

/// Rejects a reference to a row that does not exist.
async fn ensure_exists(
    conn: &mut PgConnection,
    table: &str,
    field: &str,
    id: Option<i64>,
) -> Result<(), AppError> {
    let Some(id) = id else {
        return Ok(());
    };

    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if !exists {
        warn!(field, id, "Profile update references a missing object");
        return Err(AppError::bad_request(anyhow::anyhow!(
            "{}: object with id {} does not exist",
            field,
            id
        )));
    }
    Ok(())
}

fn apply<T>(target: &mut Option<T>, change: Option<Option<T>>) {
    if let Some(value) = change {
        *target = value;
    }
}

pub struct ProfileService;

impl ProfileService {
    async fn fetch_by_user<'c>(
        conn: impl sqlx::PgExecutor<'c>,
        user_id: UserId,
        media: &MediaConfig,
    ) -> Result<Option<UserProfileResponse>, AppError> {
        let sql = format!("{}{} WHERE p.user_id = $1", PROFILE_SELECT, PROFILE_FROM);
        let row = sqlx::query_as::<_, UserProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .context("Failed to load profile")
            .map_err(AppError::database)?;

        Ok(row.map(|row| row.into_response(|path| media.absolute_url(path))))
    }

    #[instrument(skip(db, media))]
    pub async fn get_profile(
        db: &PgPool,
        user_id: UserId,
        media: &MediaConfig,
    ) -> Result<UserProfileResponse, AppError> {
        Self::fetch_by_user(db, user_id, media)
            .await?
            .ok_or_else(profile_not_found)
    }

    /// Partial update of the requester's own profile.
    #[instrument(skip(db, dto, media), fields(db.operation = "UPDATE", db.table = "user_profiles"))]
    pub async fn update_profile(
        db: &PgPool,
        requester: UserId,
        dto: UpdateUserProfileDto,
        media: &MediaConfig,
    ) -> Result<UserProfileResponse, AppError> {
        dto.check_lengths()
            .map_err(|e| AppError::unprocessable(anyhow::anyhow!(e)))?;

        let mut tx = db.begin().await?;

        let mut profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, division_id, work_department_id, institute_id,
                    education_department_id, photo, position, academic_degree, academic_title,
                    short_bio, awards_achievements, professional_development, work_experience
             FROM user_profiles WHERE user_id = $1 FOR UPDATE",
        )
        .bind(requester)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(profile_not_found)?;

        ensure_owner(requester, profile.user_id)?;

        ensure_exists(
            &mut tx,
            "institutes",
            "institute",
            dto.institute.flatten().map(|id| id.into_inner()),
        )
        .await?;
        ensure_exists(
            &mut tx,
            "departments",
            "work_department",
            dto.work_department.flatten().map(|id| id.into_inner()),
        )
        .await?;
        ensure_exists(
            &mut tx,
            "education_departments",
            "education_department",
            dto.education_department.flatten().map(|id| id.into_inner()),
        )
        .await?;

        apply(&mut profile.institute_id, dto.institute);
        apply(&mut profile.work_department_id, dto.work_department);
        apply(&mut profile.education_department_id, dto.education_department);
        apply(&mut profile.position, dto.position);
        apply(&mut profile.academic_degree, dto.academic_degree);
        apply(&mut profile.academic_title, dto.academic_title);
        apply(&mut profile.short_bio, dto.short_bio);
        apply(&mut profile.awards_achievements, dto.awards_achievements);
        apply(&mut profile.professional_development, dto.professional_development);
        apply(&mut profile.work_experience, dto.work_experience);

        sqlx::query(
            "UPDATE user_profiles SET
                institute_id = $2, work_department_id = $3, education_department_id = $4,
                position = $5, academic_degree = $6, academic_title = $7, short_bio = $8,
                awards_achievements = $9, professional_development = $10, work_experience = $11
             WHERE id = $1",
        )
        .bind(profile.id)
        .bind(profile.institute_id)
        .bind(profile.work_department_id)
        .bind(profile.education_department_id)
        .bind(&profile.position)
        .bind(&profile.academic_degree)
        .bind(&profile.academic_title)
        .bind(&profile.short_bio)
        .bind(&profile.awards_achievements)
        .bind(&profile.professional_development)
        .bind(&profile.work_experience)
        .execute(&mut *tx)
        .await?;

        let updated = Self::fetch_by_user(&mut *tx, requester, media)
            .await?
            .ok_or_else(profile_not_found)?;

        tx.commit().await?;

        info!(user.id = %requester, profile.id = profile.id, "Profile updated");

        Ok(updated)
    }

    #[instrument(skip(db, media), fields(db.operation = "SELECT", db.table = "user_profiles"))]
    pub async fn list_profiles(
        db: &PgPool,
        filters: ProfileFilterParams,
        media: &MediaConfig,
    ) -> Result<PaginatedProfilesResponse, AppError> {
        let institute = filters.institute_filter();
        let department = filters.department_filter();
        let name = filters.name.as_deref().map(like_pattern);

        let count_sql = format!("SELECT COUNT(*){}{}", PROFILE_FROM, PROFILE_FILTERS);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(institute)
            .bind(department)
            .bind(&name)
            .fetch_one(db)
            .await
            .context("Failed to count profiles")
            .map_err(AppError::database)?;

        let data_sql = format!(
            "{}{}{} ORDER BY CONCAT(u.middle_name, ' ', u.first_name, ' ', u.last_name), p.id
             LIMIT $4 OFFSET $5",
            PROFILE_SELECT, PROFILE_FROM, PROFILE_FILTERS
        );
        let rows = sqlx::query_as::<_, UserProfileRow>(&data_sql)
            .bind(institute)
            .bind(department)
            .bind(&name)
            .bind(filters.pagination.limit())
            .bind(filters.pagination.offset())
            .fetch_all(db)
            .await
            .context("Failed to fetch profiles")
            .map_err(AppError::database)?;

        debug!(total, returned = rows.len(), "Profiles fetched");

        Ok(PaginatedProfilesResponse {
            data: rows
                .into_iter()
                .map(|row| row.into_response(|path| media.absolute_url(path)))
                .collect(),
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<ProfileStats, AppError> {
        let stats = sqlx::query_as::<_, ProfileStats>(PROFILE_STATS)
            .fetch_one(db)
            .await
            .context("Failed to compute profile stats")
            .map_err(AppError::database)?;

        Ok(stats)
    }
}
