use crate::modules::profiles::controller::{
    get_own_profile, get_profile_stats, get_profiles, get_user_profile, update_own_profile,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_own_profile)
                .put(update_own_profile)
                .patch(update_own_profile),
        )
        .route("/profile/{user_id}", get(get_user_profile))
        .route("/profiles", get(get_profiles))
        .route("/profiles-stats", get(get_profile_stats))
}
