mod common;

use axum::http::StatusCode;
use brs_identity::brs_models::roles::{AdminDepartment, RoleKind};
use common::{NewTestUser, TEST_PASSWORD, body_json, create_test_user, request, setup_test_app};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn obtain_token(pool: &PgPool, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let response = setup_test_app(pool.clone())
        .oneshot(request(
            "POST",
            "/api/auth/token",
            None,
            Some(json!({ "username": username, "password": password })),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_roles_and_full_name(pool: PgPool) {
    let user = create_test_user(
        &pool,
        NewTestUser::new("ivanova", &[RoleKind::Teacher, RoleKind::Employee])
            .admin_dep(AdminDepartment::Dumr)
            .names("Ivanova", "Maria", "Petrovna"),
    )
    .await;

    let (status, body) = obtain_token(&pool, "ivanova", TEST_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user_id"], user.id.into_inner());
    assert_eq!(body["role"], json!(["employee", "teacher", "dumr"]));
    assert_eq!(body["full_name"], "Ivanova Maria Petrovna");

    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_blank_name_gives_empty_full_name(pool: PgPool) {
    create_test_user(&pool, NewTestUser::new("noname", &[RoleKind::Student])).await;

    let (status, body) = obtain_token(&pool, "noname", TEST_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "");
    assert_eq!(body["role"], json!(["student"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_test_user(&pool, NewTestUser::new("petrov", &[RoleKind::Student])).await;

    let (status, _) = obtain_token(&pool, "petrov", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = obtain_token(&pool, "nobody", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = create_test_user(&pool, NewTestUser::new("retired", &[RoleKind::Employee])).await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = obtain_token(&pool, "retired", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_picks_up_new_roles(pool: PgPool) {
    let user = create_test_user(&pool, NewTestUser::new("sidorov", &[RoleKind::Student])).await;
    let (_, body) = obtain_token(&pool, "sidorov", TEST_PASSWORD).await;
    let token = body["token"].as_str().unwrap().to_string();

    sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
        .bind(user.id)
        .bind(RoleKind::Teacher.id())
        .execute(&pool)
        .await
        .unwrap();

    let response = setup_test_app(pool.clone())
        .oneshot(request(
            "POST",
            "/api/auth/refresh-token",
            None,
            Some(json!({ "token": token })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], json!(["teacher", "student"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_invalid_token(pool: PgPool) {
    let response = setup_test_app(pool)
        .oneshot(request(
            "POST",
            "/api/auth/refresh-token",
            None,
            Some(json!({ "token": "garbage" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
