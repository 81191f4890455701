use crate::state::AppState;
use crate::validator::ValidatedJson;
use axum::Json;
use axum::extract::State;
use brs_core::AppError;
use brs_models::auth::{LoginRequest, RefreshTokenRequest, TokenResponse};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or disabled account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = AuthService::obtain_token(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Exchange a valid token for a fresh one
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed with current roles", body = TokenResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = AuthService::refresh_token(&state.db, &dto.token, &state.jwt_config).await?;
    Ok(Json(response))
}
