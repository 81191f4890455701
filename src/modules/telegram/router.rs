use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{issue_telegram_code, telegram_connect};

pub fn init_telegram_router() -> Router<AppState> {
    Router::new().route("/telegram-connect", get(telegram_connect))
}

pub fn init_internal_router() -> Router<AppState> {
    Router::new().route("/telegram-codes", post(issue_telegram_code))
}
