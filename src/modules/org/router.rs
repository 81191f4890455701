use crate::modules::org::controller::{
    create_department, create_division, create_education_department, create_institute,
    delete_department, delete_division, delete_education_department, delete_institute,
    get_department_users, get_divisions, get_institute, get_institute_departments,
    get_institute_education_departments, get_institutes, update_department, update_division,
    update_education_department, update_institute,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

pub fn init_org_router() -> Router<AppState> {
    Router::new()
        .route("/institutes", get(get_institutes))
        .route("/institutes/{id}", get(get_institute))
        .route("/institutes/{id}/departments", get(get_institute_departments))
        .route(
            "/institutes/{id}/education-departments",
            get(get_institute_education_departments),
        )
        .route("/departments/{id}/users", get(get_department_users))
}

pub fn init_admin_org_router() -> Router<AppState> {
    Router::new()
        .route("/institutes", post(create_institute))
        .route(
            "/institutes/{id}",
            patch(update_institute).delete(delete_institute),
        )
        .route("/divisions", get(get_divisions).post(create_division))
        .route("/divisions/{id}", patch(update_division).delete(delete_division))
        .route("/departments", post(create_department))
        .route(
            "/departments/{id}",
            patch(update_department).delete(delete_department),
        )
        .route("/education-departments", post(create_education_department))
        .route(
            "/education-departments/{id}",
            patch(update_education_department).delete(delete_education_department),
        )
}
