mod common;

use axum::http::StatusCode;
use brs_identity::brs_models::roles::{AdminDepartment, RoleKind};
use common::{NewTestUser, body_json, create_test_user, request, setup_test_app, token_for};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn admin_token(pool: &PgPool) -> String {
    let admin = create_test_user(pool, NewTestUser::new("root", &[]).staff()).await;
    token_for(&admin, &[], true)
}

async fn call(pool: &PgPool, method: &str, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = setup_test_app(pool.clone())
        .oneshot(request(method, uri, Some(token), body))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn profile_count(pool: &PgPool, table: &str, user_id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", table))
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_user_with_roles_creates_profiles(pool: PgPool) {
    let token = admin_token(&pool).await;

    let (status, body) = call(
        &pool,
        "POST",
        "/api/admin/users",
        &token,
        Some(json!({
            "username": "petrova",
            "password": "s3cretpass",
            "email": "petrova@brs.test",
            "middle_name": "Petrova",
            "first_name": "Maria",
            "last_name": "Ivanovna",
            "admin_dep": "dumr",
            "roles": ["teacher", "student"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "petrova");
    assert_eq!(body["full_name"], "Petrova Maria Ivanovna");
    assert_eq!(body["roles"], json!(["teacher", "student"]));
    assert_eq!(body["profiles"]["user_profile"], true);
    assert_eq!(body["profiles"]["student_profile"], true);
    assert_eq!(body["profiles"]["brs_admin_profile"], false);
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());

    let id = body["id"].as_i64().unwrap();
    assert_eq!(profile_count(&pool, "user_profiles", id).await, 1);
    assert_eq!(profile_count(&pool, "student_profiles", id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_user_rejects_duplicates_and_bad_input(pool: PgPool) {
    let token = admin_token(&pool).await;
    let new_user = json!({ "username": "twin", "password": "s3cretpass" });

    let (status, _) = call(&pool, "POST", "/api/admin/users", &token, Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&pool, "POST", "/api/admin/users", &token, Some(new_user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("username"));

    let (status, _) = call(
        &pool,
        "POST",
        "/api/admin/users",
        &token,
        Some(json!({ "username": "shorty", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &pool,
        "POST",
        "/api/admin/users",
        &token,
        Some(json!({ "username": "ghost", "password": "s3cretpass", "roles": ["wizard"] })),
    )
    .await;
    assert!(status.is_client_error());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_filters(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_test_user(
        &pool,
        NewTestUser::new("t_sidorov", &[RoleKind::Teacher]).names("Sidorov", "Ivan", ""),
    )
    .await;
    create_test_user(
        &pool,
        NewTestUser::new("s_abramova", &[RoleKind::Student]).names("Abramova", "Olga", ""),
    )
    .await;

    let (status, body) = call(&pool, "GET", "/api/admin/users", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);

    let (_, body) = call(&pool, "GET", "/api/admin/users?role=teacher", &token, None).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["username"], "t_sidorov");

    let (_, body) = call(&pool, "GET", "/api/admin/users?search=olga", &token, None).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["username"], "s_abramova");

    let (status, _) = call(&pool, "GET", "/api/admin/users?role=wizard", &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_user(pool: PgPool) {
    let token = admin_token(&pool).await;
    let user = create_test_user(
        &pool,
        NewTestUser::new("editable", &[]).admin_dep(AdminDepartment::Unir),
    )
    .await;

    let (status, body) = call(
        &pool,
        "PATCH",
        &format!("/api/admin/users/{}", user.id),
        &token,
        Some(json!({ "first_name": "Nina", "admin_dep": null, "is_active": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Nina");
    assert!(body["admin_dep"].is_null());
    assert_eq!(body["is_active"], false);

    let (status, _) = call(
        &pool,
        "PATCH",
        "/api/admin/users/999999",
        &token,
        Some(json!({ "first_name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_endpoints_keep_profiles_in_sync(pool: PgPool) {
    let token = admin_token(&pool).await;
    let user = create_test_user(&pool, NewTestUser::new("shifting", &[RoleKind::Teacher])).await;
    let id = user.id.into_inner();
    let roles_uri = format!("/api/admin/users/{}/roles", id);

    let (status, body) = call(
        &pool,
        "POST",
        &roles_uri,
        &token,
        Some(json!({ "roles": ["brs_admin"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["teacher", "brs_admin"]));
    assert_eq!(profile_count(&pool, "brs_admin_profiles", id).await, 1);

    let (status, body) = call(
        &pool,
        "PUT",
        &roles_uri,
        &token,
        Some(json!({ "roles": ["student"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["student"]));
    assert_eq!(profile_count(&pool, "user_profiles", id).await, 0);
    assert_eq!(profile_count(&pool, "brs_admin_profiles", id).await, 0);
    assert_eq!(profile_count(&pool, "student_profiles", id).await, 1);

    let (status, body) = call(&pool, "DELETE", &format!("{}/student", roles_uri), &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!([]));
    assert_eq!(profile_count(&pool, "student_profiles", id).await, 0);

    let (status, _) = call(&pool, "DELETE", &format!("{}/wizard", roles_uri), &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    call(&pool, "PUT", &roles_uri, &token, Some(json!({ "roles": ["employee", "deccan"] }))).await;
    let (status, body) = call(&pool, "DELETE", &roles_uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!([]));
    assert_eq!(body["profiles"]["user_profile"], false);
    assert_eq!(body["profiles"]["brs_admin_profile"], false);

    let (status, _) = call(&pool, "DELETE", "/api/admin/users/999999/roles", &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_own_roles_and_catalog(pool: PgPool) {
    let user = create_test_user(
        &pool,
        NewTestUser::new("dumr_teacher", &[RoleKind::Teacher, RoleKind::Employee])
            .admin_dep(AdminDepartment::Dumr),
    )
    .await;
    let token = token_for(&user, &[RoleKind::Teacher], false);

    let (status, body) = call(&pool, "GET", "/api/roles", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["employee", "teacher", "dumr"]));

    let (status, _) = call(&pool, "GET", "/api/admin/roles", &token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&pool).await;
    let (status, body) = call(&pool, "GET", "/api/admin/roles", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    let catalog = body.as_array().unwrap();
    assert_eq!(catalog.len(), 8);
    assert_eq!(catalog[0], json!({ "id": 1, "name": "employee" }));
    assert_eq!(catalog[7], json!({ "id": 8, "name": "deccan" }));
}
