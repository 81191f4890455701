use anyhow::Context;
use brs_core::AppError;
use brs_db::{is_foreign_key_violation, is_unique_violation};
use brs_models::ids::UserId;
use brs_models::reference::UserAlias;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

fn alias_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Alias not found"))
}

pub struct AliasService;

impl AliasService {
    #[instrument(skip(db))]
    pub async fn list_aliases(db: &PgPool) -> Result<Vec<UserAlias>, AppError> {
        let aliases = sqlx::query_as::<_, UserAlias>(
            "SELECT id, user_id, alias FROM user_aliases ORDER BY alias",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch aliases")
        .map_err(AppError::database)?;

        Ok(aliases)
    }

    #[instrument(skip(db))]
    pub async fn get_alias(db: &PgPool, user_id: UserId) -> Result<UserAlias, AppError> {
        sqlx::query_as::<_, UserAlias>(
            "SELECT id, user_id, alias FROM user_aliases WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(alias_not_found)
    }

    /// Gives the user `alias`, replacing the alias it had before.
    #[instrument(skip(db))]
    pub async fn set_alias(db: &PgPool, user_id: UserId, alias: &str) -> Result<UserAlias, AppError> {
        let stored = sqlx::query_as::<_, UserAlias>(
            "INSERT INTO user_aliases (user_id, alias) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET alias = EXCLUDED.alias
             RETURNING id, user_id, alias",
        )
        .bind(user_id)
        .bind(alias)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(user.id = %user_id, "Rejected alias already held by another user");
                return AppError::bad_request(anyhow::anyhow!("This alias is already taken"));
            }
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow::anyhow!("User not found"));
            }
            AppError::database(e)
        })?;

        info!(user.id = %user_id, "Alias set");
        Ok(stored)
    }

    #[instrument(skip(db))]
    pub async fn delete_alias(db: &PgPool, user_id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_aliases WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(alias_not_found());
        }

        info!(user.id = %user_id, "Alias removed");
        Ok(())
    }
}
