use brs_config::ServerConfig;
use brs_identity::logging::init_tracing;
use brs_identity::router::init_router;
use brs_identity::state::init_app_state;
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let server_config = ServerConfig::from_env();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server_config.addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!(addr = %server_config.addr, "Server running");
    tracing::info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app).await.expect("Server error");
}
