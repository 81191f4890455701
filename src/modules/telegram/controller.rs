use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use brs_core::AppError;
use brs_models::auth::MessageResponse;
use brs_models::telegram::{TelegramCodeRequest, TelegramCodeResponse, TelegramConnectParams};
use tracing::instrument;

use crate::middleware::api_key::InternalApiAccess;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::TelegramService;

/// Link a Telegram account with a code from the bot
#[utoipa::path(
    get,
    path = "/api/telegram-connect",
    params(TelegramConnectParams),
    responses(
        (status = 200, description = "Telegram account linked", body = MessageResponse),
        (status = 400, description = "Invalid code, or the account already has a Telegram id", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "The Telegram id could not be stored", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Telegram"
)]
#[instrument(skip(state, params))]
pub async fn telegram_connect(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<TelegramConnectParams>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = TelegramService::connect(
        &state.db,
        state.cache(),
        &state.cache_config,
        auth_user.user_id()?,
        params.code.as_deref(),
    )
    .await?;
    Ok(outcome)
}

/// Issue a link code for a Telegram id
///
/// Called by the bot. A new code replaces any code issued before for the
/// same Telegram id.
#[utoipa::path(
    post,
    path = "/api/internal/telegram-codes",
    request_body = TelegramCodeRequest,
    responses(
        (status = 200, description = "Code issued", body = TelegramCodeResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 422, description = "Telegram id is not positive", body = ErrorResponse),
        (status = 503, description = "No cache backend", body = ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "Telegram"
)]
#[instrument(skip(state, _access))]
pub async fn issue_telegram_code(
    State(state): State<AppState>,
    _access: InternalApiAccess,
    ValidatedJson(dto): ValidatedJson<TelegramCodeRequest>,
) -> Result<Json<TelegramCodeResponse>, AppError> {
    let code =
        TelegramService::issue_code(state.cache(), &state.cache_config, dto.telegram_id).await?;
    Ok(Json(TelegramCodeResponse { code }))
}
