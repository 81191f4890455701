use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::middleware::api_key::API_KEY_HEADER;
use crate::middleware::role::require_staff;
use crate::modules::aliases::router::{init_admin_aliases_router, init_user_alias_router};
use crate::modules::auth::router::init_auth_router;
use crate::modules::brs_admins::router::init_admin_brs_admins_router;
use crate::modules::catalogs::router::init_admin_catalogs_router;
use crate::modules::org::router::{init_admin_org_router, init_org_router};
use crate::modules::profiles::router::init_profiles_router;
use crate::modules::roles::router::{init_admin_roles_router, init_roles_router};
use crate::modules::students::router::init_admin_students_router;
use crate::modules::telegram::router::{init_internal_router, init_telegram_router};
use crate::modules::users::router::init_admin_users_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware};
use brs_config::CorsConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn init_admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest(
            "/users",
            init_admin_users_router().merge(init_user_alias_router()),
        )
        .nest("/students", init_admin_students_router())
        .nest("/brs-admins", init_admin_brs_admins_router())
        .merge(init_admin_org_router())
        .merge(init_admin_roles_router())
        .merge(init_admin_catalogs_router())
        .merge(init_admin_aliases_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/admin", init_admin_router(&state))
                .nest("/internal", init_internal_router())
                .merge(init_org_router())
                .merge(init_profiles_router())
                .merge(init_roles_router())
                .merge(init_telegram_router()),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
            REQUEST_ID_HEADER,
        ])
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true)
}
