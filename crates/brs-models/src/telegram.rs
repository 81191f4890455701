//! Telegram account linking.
//!
//! The bot asks for a one-time code for a Telegram id; the user then submits
//! that code while authenticated to bind the Telegram id to their account.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct TelegramConnectParams {
    /// One-time link code issued by the bot
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TelegramCodeRequest {
    #[validate(range(min = 1))]
    pub telegram_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TelegramCodeResponse {
    pub code: String,
}
