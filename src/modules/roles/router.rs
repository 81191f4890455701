use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_own_roles, get_role_catalog};

pub fn init_roles_router() -> Router<AppState> {
    Router::new().route("/roles", get(get_own_roles))
}

pub fn init_admin_roles_router() -> Router<AppState> {
    Router::new().route("/roles", get(get_role_catalog))
}
