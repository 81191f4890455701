use anyhow::Context;
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::roles::{AdminDepartment, Role, RoleKind, RoleSet};
use sqlx::PgPool;
use tracing::instrument;

/// Role names of a user as stored, ordered by role id, plus `dumr` for
/// DUMR staff.
#[instrument(skip(db))]
pub async fn get_user_role_names(db: &PgPool, user_id: UserId) -> Result<Vec<String>, AppError> {
    let admin_dep = sqlx::query_scalar::<_, Option<AdminDepartment>>(
        "SELECT admin_dep FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

    let roles = sqlx::query_scalar::<_, RoleKind>(
        "SELECT role_id FROM user_roles WHERE user_id = $1 ORDER BY role_id",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("Failed to fetch user roles")
    .map_err(AppError::database)?;

    Ok(RoleSet::new(roles).display_names(admin_dep))
}

/// The seeded role catalog.
#[instrument(skip(db))]
pub async fn get_role_catalog(db: &PgPool) -> Result<Vec<Role>, AppError> {
    let ids = sqlx::query_scalar::<_, i16>("SELECT id FROM roles ORDER BY id")
        .fetch_all(db)
        .await
        .context("Failed to fetch roles")
        .map_err(AppError::database)?;

    Ok(ids
        .into_iter()
        .filter_map(RoleKind::from_id)
        .map(Role::from)
        .collect())
}
