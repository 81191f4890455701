use brs_core::AppError;
use brs_db::is_foreign_key_violation;
use brs_models::ids::UserId;
use brs_models::profiles::{BrsAdminProfile, UpdateBrsAdminProfileDto};
use sqlx::PgPool;
use tracing::{info, instrument};

fn brs_admin_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("BRS admin profile not found"))
}

pub struct BrsAdminService;

impl BrsAdminService {
    #[instrument(skip(db))]
    pub async fn get_brs_admin(db: &PgPool, user_id: UserId) -> Result<BrsAdminProfile, AppError> {
        sqlx::query_as::<_, BrsAdminProfile>(
            "SELECT id, user_id, institute_id FROM brs_admin_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(brs_admin_not_found)
    }

    #[instrument(skip(db))]
    pub async fn update_brs_admin(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateBrsAdminProfileDto,
    ) -> Result<BrsAdminProfile, AppError> {
        let profile = sqlx::query_as::<_, BrsAdminProfile>(
            "UPDATE brs_admin_profiles
             SET institute_id = CASE WHEN $2 THEN $3 ELSE institute_id END
             WHERE user_id = $1
             RETURNING id, user_id, institute_id",
        )
        .bind(user_id)
        .bind(dto.institute_id.is_some())
        .bind(dto.institute_id.flatten())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::bad_request(anyhow::anyhow!("Institute does not exist"));
            }
            AppError::database(e)
        })?
        .ok_or_else(brs_admin_not_found)?;

        info!(user.id = %user_id, institute.id = ?profile.institute_id, "BRS admin profile updated");

        Ok(profile)
    }
}
