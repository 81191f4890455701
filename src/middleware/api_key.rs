use axum::{extract::FromRequestParts, http::request::Parts};
use brs_core::AppError;

use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticates service-to-service calls by the `X-API-KEY` header.
///
/// With no key configured every request is rejected.
#[derive(Debug, Clone, Copy)]
pub struct InternalApiAccess;

impl FromRequestParts<AppState> for InternalApiAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        check_api_key(provided, state.internal_api_config.api_key.as_deref())?;

        Ok(InternalApiAccess)
    }
}

fn check_api_key(provided: &str, expected: Option<&str>) -> Result<(), AppError> {
    if provided.is_empty() {
        return Err(AppError::unauthorized("No API key".to_string()));
    }
    if expected != Some(provided) {
        return Err(AppError::unauthorized("Wrong API key".to_string()));
    }
    Ok(())
}
