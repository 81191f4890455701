mod common;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use brs_identity::brs_models::roles::{AdminDepartment, RoleKind};
use brs_identity::middleware::auth::{IsBrsAdmin, IsDeccan, IsEmployee, IsStudent, IsTeacher};
use common::{
    NewTestUser, TEST_API_KEY, body_json, create_test_user, lazy_pool, request, setup_test_app,
    test_state, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn guarded_app(pool: &PgPool) -> Router {
    Router::new()
        .route("/employee", get(|_: IsEmployee| async { "ok" }))
        .route("/student", get(|_: IsStudent| async { "ok" }))
        .route("/teacher", get(|_: IsTeacher| async { "ok" }))
        .route("/brs-admin", get(|_: IsBrsAdmin| async { "ok" }))
        .route("/deccan", get(|_: IsDeccan| async { "ok" }))
        .with_state(test_state(pool.clone()))
}

async fn status_of(app: Router, uri: &str, token: Option<&str>) -> StatusCode {
    app.oneshot(request("GET", uri, token, None))
        .await
        .unwrap()
        .status()
}

async fn user_token(pool: &PgPool, new: NewTestUser<'_>) -> String {
    let roles = new.roles;
    let is_staff = new.is_staff;
    let user = create_test_user(pool, new).await;
    token_for(&user, roles, is_staff)
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_test_app(lazy_pool());
    let response = app
        .oneshot(request("GET", "/api/profile", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = setup_test_app(lazy_pool());
    let status = status_of(app, "/api/roles", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_extractors(pool: PgPool) {
    let student = user_token(&pool, NewTestUser::new("p_student", &[RoleKind::Student])).await;
    let teacher = user_token(&pool, NewTestUser::new("p_teacher", &[RoleKind::Teacher])).await;
    let brs_admin =
        user_token(&pool, NewTestUser::new("p_brs_admin", &[RoleKind::BrsAdmin])).await;
    let admin = user_token(&pool, NewTestUser::new("p_admin", &[RoleKind::Admin])).await;

    assert_eq!(status_of(guarded_app(&pool), "/student", Some(&student)).await, StatusCode::OK);
    assert_eq!(
        status_of(guarded_app(&pool), "/student", Some(&teacher)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(status_of(guarded_app(&pool), "/teacher", Some(&teacher)).await, StatusCode::OK);
    assert_eq!(
        status_of(guarded_app(&pool), "/teacher", Some(&brs_admin)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_of(guarded_app(&pool), "/brs-admin", Some(&brs_admin)).await,
        StatusCode::OK
    );
    assert_eq!(status_of(guarded_app(&pool), "/employee", Some(&admin)).await, StatusCode::OK);
    assert_eq!(
        status_of(guarded_app(&pool), "/employee", Some(&student)).await,
        StatusCode::FORBIDDEN
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deccan_access(pool: PgPool) {
    let dumr = user_token(
        &pool,
        NewTestUser::new("p_dumr", &[RoleKind::Employee]).admin_dep(AdminDepartment::Dumr),
    )
    .await;
    let deccan = user_token(&pool, NewTestUser::new("p_deccan", &[RoleKind::Deccan])).await;
    let staff = user_token(&pool, NewTestUser::new("p_staff", &[]).staff()).await;
    let other_dep = user_token(
        &pool,
        NewTestUser::new("p_uvr", &[RoleKind::Employee]).admin_dep(AdminDepartment::Uvr),
    )
    .await;

    assert_eq!(status_of(guarded_app(&pool), "/deccan", Some(&dumr)).await, StatusCode::OK);
    assert_eq!(status_of(guarded_app(&pool), "/deccan", Some(&deccan)).await, StatusCode::OK);
    assert_eq!(status_of(guarded_app(&pool), "/deccan", Some(&staff)).await, StatusCode::OK);
    assert_eq!(
        status_of(guarded_app(&pool), "/deccan", Some(&other_dep)).await,
        StatusCode::FORBIDDEN
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permissions_follow_stored_roles_not_token(pool: PgPool) {
    // Token claims teacher, the account only holds student.
    let user = create_test_user(&pool, NewTestUser::new("p_claims", &[RoleKind::Student])).await;
    let token = token_for(&user, &[RoleKind::Teacher, RoleKind::Employee], true);

    assert_eq!(
        status_of(guarded_app(&pool), "/teacher", Some(&token)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(status_of(guarded_app(&pool), "/student", Some(&token)).await, StatusCode::OK);

    let status = status_of(setup_test_app(pool.clone()), "/api/admin/users", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_disabled_staff_loses_access_with_old_token(pool: PgPool) {
    let root = user_token(&pool, NewTestUser::new("p_root", &[]).staff()).await;
    let demoted = create_test_user(&pool, NewTestUser::new("demoted", &[]).staff()).await;
    let old_token = token_for(&demoted, &[], true);

    let status = status_of(setup_test_app(pool.clone()), "/api/admin/users", Some(&old_token)).await;
    assert_eq!(status, StatusCode::OK);

    let response = setup_test_app(pool.clone())
        .oneshot(request(
            "PATCH",
            &format!("/api/admin/users/{}", demoted.id),
            Some(&root),
            Some(json!({ "is_active": false, "is_staff": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = setup_test_app(pool.clone())
        .oneshot(request("GET", "/api/admin/users", Some(&old_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "User account is disabled");

    let response = setup_test_app(pool.clone())
        .oneshot(request(
            "POST",
            "/api/admin/users",
            Some(&old_token),
            Some(json!({
                "username": "backdoor",
                "password": "backdoor-pass-1",
                "roles": ["employee"]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let created: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'backdoor'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(created, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_flag_removal_applies_immediately(pool: PgPool) {
    let user = create_test_user(&pool, NewTestUser::new("p_former", &[]).staff()).await;
    let token = token_for(&user, &[], true);

    sqlx::query("UPDATE users SET is_staff = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let status = status_of(setup_test_app(pool.clone()), "/api/admin/roles", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_of_deleted_user_is_unauthorized(pool: PgPool) {
    let user = create_test_user(&pool, NewTestUser::new("p_gone", &[RoleKind::Employee])).await;
    let token = token_for(&user, &[RoleKind::Employee], false);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let status = status_of(setup_test_app(pool.clone()), "/api/roles", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_only_endpoints_reject_students(pool: PgPool) {
    let student = user_token(&pool, NewTestUser::new("p_pupil", &[RoleKind::Student])).await;

    let response = setup_test_app(pool.clone())
        .oneshot(request("GET", "/api/institutes/1/departments", Some(&student), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "You are not an employee");

    let status = status_of(setup_test_app(pool.clone()), "/api/profiles-stats", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_stats_hidden_from_non_staff_employees(pool: PgPool) {
    let employee = user_token(&pool, NewTestUser::new("p_clerk", &[RoleKind::Employee])).await;
    let status = status_of(setup_test_app(pool.clone()), "/api/profiles-stats", Some(&employee)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_surface_requires_staff(pool: PgPool) {
    let admin_role = user_token(
        &pool,
        NewTestUser::new("p_admin_role", &[RoleKind::Employee, RoleKind::Admin]),
    )
    .await;

    let unauthenticated = status_of(setup_test_app(pool.clone()), "/api/admin/users", None).await;
    assert_eq!(unauthenticated, StatusCode::UNAUTHORIZED);

    let response = setup_test_app(pool.clone())
        .oneshot(request("GET", "/api/admin/roles", Some(&admin_role), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Staff access required");
}

#[tokio::test]
async fn test_internal_api_key_checks() {
    let body = json!({ "telegram_id": 12345 });

    let app = setup_test_app(lazy_pool());
    let response = app
        .oneshot(request("POST", "/api/internal/telegram-codes", None, Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "No API key");

    let mut wrong = request("POST", "/api/internal/telegram-codes", None, Some(body.clone()));
    wrong
        .headers_mut()
        .insert("x-api-key", "guess".parse().unwrap());
    let response = setup_test_app(lazy_pool()).oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Wrong API key");

    let mut right = request("POST", "/api/internal/telegram-codes", None, Some(body));
    right
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());
    let response = setup_test_app(lazy_pool()).oneshot(right).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_internal_code_request_is_validated() {
    let mut req = request(
        "POST",
        "/api/internal/telegram-codes",
        None,
        Some(json!({ "telegram_id": 0 })),
    );
    req.headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());

    let response = setup_test_app(lazy_pool()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("telegram_id"));
}
