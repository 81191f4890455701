use crate::modules::users::controller::{
    add_user_roles, clear_user_roles, create_user, get_user, get_users, remove_user_role,
    replace_user_roles, update_user,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, put},
};

pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).patch(update_user))
        .route(
            "/{id}/roles",
            put(replace_user_roles)
                .post(add_user_roles)
                .delete(clear_user_roles),
        )
        .route("/{id}/roles/{role}", delete(remove_user_role))
}
