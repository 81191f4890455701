use crate::modules::brs_admins::controller::{get_brs_admin, update_brs_admin};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_admin_brs_admins_router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_brs_admin).patch(update_brs_admin))
}
