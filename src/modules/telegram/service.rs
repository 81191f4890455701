use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brs_cache::{CacheConfig, RedisCache, link_codes};
use brs_core::AppError;
use brs_models::auth::MessageResponse;
use brs_models::ids::UserId;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

/// Result of a link attempt, rendered as `{"message": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    InvalidCode,
    AlreadyLinked,
    StorageFailed,
    Linked,
}

impl LinkOutcome {
    pub fn status(self) -> StatusCode {
        match self {
            LinkOutcome::InvalidCode | LinkOutcome::AlreadyLinked => StatusCode::BAD_REQUEST,
            LinkOutcome::StorageFailed => StatusCode::INTERNAL_SERVER_ERROR,
            LinkOutcome::Linked => StatusCode::OK,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LinkOutcome::InvalidCode => "Invalid code",
            LinkOutcome::AlreadyLinked => "Telegram account cannot be linked",
            LinkOutcome::StorageFailed => "Execution error",
            LinkOutcome::Linked => "Telegram account linked",
        }
    }
}

impl IntoResponse for LinkOutcome {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self.message()))).into_response()
    }
}

pub struct TelegramService;

impl TelegramService {
    /// Binds the Telegram id behind `code` to the requester.
    #[instrument(skip(db, cache, config, code))]
    pub async fn connect(
        db: &PgPool,
        cache: Option<&RedisCache>,
        config: &CacheConfig,
        user_id: UserId,
        code: Option<&str>,
    ) -> Result<LinkOutcome, AppError> {
        let (Some(cache), Some(code)) = (cache, code.filter(|c| !c.is_empty())) else {
            return Ok(LinkOutcome::InvalidCode);
        };

        let Some(telegram_id) = link_codes::resolve(cache, config, code).await else {
            warn!(user.id = %user_id, "Unknown or expired Telegram link code");
            return Ok(LinkOutcome::InvalidCode);
        };

        let outcome = Self::link_account(db, user_id, telegram_id).await?;
        if outcome != LinkOutcome::Linked {
            return Ok(outcome);
        }

        if let Err(e) = link_codes::consume(cache, config, code, telegram_id).await {
            warn!(error = %e, "Failed to delete used Telegram link code");
        }

        info!(user.id = %user_id, telegram_id, "Telegram account linked");

        Ok(LinkOutcome::Linked)
    }

    /// Stores `telegram_id` on a user that has none yet.
    #[instrument(skip(db))]
    pub async fn link_account(
        db: &PgPool,
        user_id: UserId,
        telegram_id: i64,
    ) -> Result<LinkOutcome, AppError> {
        let current = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT telegram_id FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if current.is_some() {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let updated = sqlx::query(
            "UPDATE users SET telegram_id = $2 WHERE id = $1 AND telegram_id IS NULL",
        )
        .bind(user_id)
        .bind(telegram_id)
        .execute(db)
        .await;

        match updated {
            Ok(result) if result.rows_affected() == 0 => Ok(LinkOutcome::AlreadyLinked),
            Ok(_) => Ok(LinkOutcome::Linked),
            Err(e) => {
                error!(user.id = %user_id, telegram_id, error = %e, "Failed to store Telegram id");
                Ok(LinkOutcome::StorageFailed)
            }
        }
    }

    /// Issues a one-time code for the bot.
    #[instrument(skip(cache, config))]
    pub async fn issue_code(
        cache: Option<&RedisCache>,
        config: &CacheConfig,
        telegram_id: i64,
    ) -> Result<String, AppError> {
        let cache = cache.ok_or_else(|| {
            AppError::service_unavailable("Link codes are unavailable".to_string())
        })?;

        let code = link_codes::issue(cache, config, telegram_id).await?;
        Ok(code)
    }
}
