mod common;

use axum::http::StatusCode;
use brs_identity::brs_models::roles::RoleKind;
use common::{NewTestUser, body_json, create_test_user, request, setup_test_app, token_for};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn call(pool: &PgPool, method: &str, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = setup_test_app(pool.clone())
        .oneshot(request(method, uri, Some(token), body))
        .await
        .unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, body_json(response).await)
}

async fn admin_token(pool: &PgPool) -> String {
    let admin = create_test_user(pool, NewTestUser::new("ref_admin", &[]).staff()).await;
    token_for(&admin, &[], true)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_academic_degree_catalog(pool: PgPool) {
    let admin = admin_token(&pool).await;

    let (status, doctor) = call(
        &pool,
        "POST",
        "/api/admin/academic-degrees",
        &admin,
        Some(json!({ "name": "Doctor of Sciences" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(doctor["name"], "Doctor of Sciences");
    let doctor_id = doctor["id"].as_i64().unwrap();

    let (status, _) = call(
        &pool,
        "POST",
        "/api/admin/academic-degrees",
        &admin,
        Some(json!({ "name": "Candidate of Sciences" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&pool, "GET", "/api/admin/academic-degrees", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Candidate of Sciences", "Doctor of Sciences"]);

    let uri = format!("/api/admin/academic-degrees/{}", doctor_id);
    let (status, body) = call(&pool, "PATCH", &uri, &admin, Some(json!({ "name": "DSc" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": doctor_id, "name": "DSc" }));

    let (status, _) = call(&pool, "DELETE", &uri, &admin, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&pool, "DELETE", &uri, &admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Academic degree not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_academic_title_catalog(pool: PgPool) {
    let admin = admin_token(&pool).await;

    let (status, _) = call(
        &pool,
        "POST",
        "/api/admin/academic-titles",
        &admin,
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, professor) = call(
        &pool,
        "POST",
        "/api/admin/academic-titles",
        &admin,
        Some(json!({ "name": "Professor" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&pool, "GET", "/api/admin/academic-titles", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([professor]));

    // Degrees and titles are separate tables.
    let (_, degrees) = call(&pool, "GET", "/api/admin/academic-degrees", &admin, None).await;
    assert_eq!(degrees, json!([]));

    let (status, body) = call(
        &pool,
        "PATCH",
        "/api/admin/academic-titles/99999",
        &admin,
        Some(json!({ "name": "Docent" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Academic title not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalogs_require_staff(pool: PgPool) {
    let teacher = create_test_user(&pool, NewTestUser::new("ref_teacher", &[RoleKind::Teacher])).await;
    let token = token_for(&teacher, &[RoleKind::Teacher], false);

    let (status, _) = call(&pool, "GET", "/api/admin/academic-degrees", &token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&pool, "GET", "/api/admin/aliases", &token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_alias_lifecycle(pool: PgPool) {
    let admin = admin_token(&pool).await;
    let ivanov = create_test_user(&pool, NewTestUser::new("ivanov", &[RoleKind::Teacher])).await;
    let petrov = create_test_user(&pool, NewTestUser::new("petrov", &[RoleKind::Teacher])).await;
    let ivanov_uri = format!("/api/admin/users/{}/alias", ivanov.id);
    let petrov_uri = format!("/api/admin/users/{}/alias", petrov.id);

    let (status, body) = call(&pool, "GET", &ivanov_uri, &admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Alias not found");

    let (status, body) = call(&pool, "PUT", &ivanov_uri, &admin, Some(json!({ "alias": "ivanov.ii" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], ivanov.id.into_inner());
    assert_eq!(body["alias"], "ivanov.ii");
    let alias_id = body["id"].clone();

    // Replacing keeps one row per user.
    let (status, body) = call(&pool, "PUT", &ivanov_uri, &admin, Some(json!({ "alias": "i.ivanov" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], alias_id);
    assert_eq!(body["alias"], "i.ivanov");

    let (status, body) = call(&pool, "PUT", &petrov_uri, &admin, Some(json!({ "alias": "i.ivanov" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This alias is already taken");

    let (status, _) = call(&pool, "PUT", &petrov_uri, &admin, Some(json!({ "alias": "a.petrov" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&pool, "GET", "/api/admin/aliases", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    let aliases: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["alias"].as_str().unwrap())
        .collect();
    assert_eq!(aliases, vec!["a.petrov", "i.ivanov"]);

    let (status, _) = call(&pool, "DELETE", &ivanov_uri, &admin, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&pool, "DELETE", &ivanov_uri, &admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting the user drops the alias with it.
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(petrov.id)
        .execute(&pool)
        .await
        .unwrap();
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_aliases")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_alias_for_missing_user(pool: PgPool) {
    let admin = admin_token(&pool).await;

    let (status, body) = call(
        &pool,
        "PUT",
        "/api/admin/users/777777/alias",
        &admin,
        Some(json!({ "alias": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = call(
        &pool,
        "PUT",
        "/api/admin/users/777777/alias",
        &admin,
        Some(json!({ "alias": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
