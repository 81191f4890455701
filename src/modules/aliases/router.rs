use crate::modules::aliases::controller::{
    delete_user_alias, get_aliases, get_user_alias, set_user_alias,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_admin_aliases_router() -> Router<AppState> {
    Router::new().route("/aliases", get(get_aliases))
}

/// Alias routes relative to `/users`.
pub fn init_user_alias_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/alias",
        get(get_user_alias)
            .put(set_user_alias)
            .delete(delete_user_alias),
    )
}
