use crate::modules::catalogs::controller::{
    create_academic_degree, create_academic_title, delete_academic_degree, delete_academic_title,
    get_academic_degrees, get_academic_titles, update_academic_degree, update_academic_title,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

pub fn init_admin_catalogs_router() -> Router<AppState> {
    Router::new()
        .route(
            "/academic-degrees",
            get(get_academic_degrees).post(create_academic_degree),
        )
        .route(
            "/academic-degrees/{id}",
            patch(update_academic_degree).delete(delete_academic_degree),
        )
        .route(
            "/academic-titles",
            get(get_academic_titles).post(create_academic_title),
        )
        .route(
            "/academic-titles/{id}",
            patch(update_academic_title).delete(delete_academic_title),
        )
}
