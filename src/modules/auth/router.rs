use crate::state::AppState;
use axum::{Router, routing::post};

use super::controller::{obtain_token, refresh_token};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/refresh-token", post(refresh_token))
}
