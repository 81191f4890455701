use crate::modules::students::controller::{get_student, update_student};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_admin_students_router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_student).patch(update_student))
}
