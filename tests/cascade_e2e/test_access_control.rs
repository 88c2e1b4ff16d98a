//! E2E tests: Identity header and role checks over HTTP.

use actix_web::test::TestRequest;
use serde_json::json;
use testledger_lib::db;
use testledger_lib::models::{ExecutionStatus, Role};

use super::test_helpers::*;

/// (1) Requests without a valid, active user are rejected with 401.
#[actix_rt::test]
async fn test_identity_header_is_required() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/projects"), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = call(&app, TestRequest::get().uri("/api/v1/projects"), Some(9999)).await;
    assert_eq!(status, 401, "Unknown user ids are rejected");

    let bad = TestRequest::get()
        .uri("/api/v1/projects")
        .insert_header((testledger_lib::config::USER_ID_HEADER, "not-a-number"));
    let (status, _) = call(&app, bad, None).await;
    assert_eq!(status, 401);

    db::users::set_active(pool.connection(), tester.id, false)
        .await
        .expect("deactivate tester");
    let (status, _) = call(&app, TestRequest::get().uri("/api/v1/projects"), Some(tester.id)).await;
    assert_eq!(status, 401, "Inactive users are rejected");

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/projects"), Some(admin.id)).await;
    assert_eq!(status, 200);
    assert!(body.is_array());
}

/// (2) Role-gated endpoints answer 403 to lower roles.
#[actix_rt::test]
async fn test_role_gates() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", manager.id).await;
    let app = create_test_app(&pool).await;

    let (status, _) = call(&app, TestRequest::get().uri("/api/v1/reports"), Some(tester.id)).await;
    assert_eq!(status, 403);
    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/reports"), Some(manager.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["pass_rate"], 0.0);

    let (status, _) = call(&app, TestRequest::get().uri("/api/v1/users/stats"), Some(manager.id)).await;
    assert_eq!(status, 403);

    let bulk = TestRequest::post()
        .uri("/api/v1/projects/bulk-delete")
        .set_json(json!({ "ids": [project.id] }));
    let (status, _) = call(&app, bulk, Some(tester.id)).await;
    assert_eq!(status, 403);

    let (status, _) = call(
        &app,
        TestRequest::delete().uri(&format!("/api/v1/users/{}", admin.id)),
        Some(admin.id),
    )
    .await;
    assert_eq!(status, 403, "Admins cannot delete themselves");

    let second_admin = TestRequest::post().uri("/api/v1/users").set_json(json!({
        "username": "root2",
        "email": "root2@testledger.local",
        "password_hash": "$2b$12$x",
        "role": "admin",
    }));
    let (status, _) = call(&app, second_admin, Some(admin.id)).await;
    assert_eq!(status, 409);

    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "users", "1=1").await, 3);
}

/// (3) Deleting over HTTP returns the cascade report.
#[actix_rt::test]
async fn test_delete_project_over_http() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let project = seed_project(&pool, "Alpha", manager.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, manager.id).await;
    seed_execution(&pool, case.id, manager.id, ExecutionStatus::Pass).await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        TestRequest::delete().uri(&format!("/api/v1/projects/{}", project.id)),
        Some(manager.id),
    )
    .await;
    assert_eq!(status, 200, "Unexpected body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["report"]["deleted"]["test_case"], 1);
    assert_eq!(body["report"]["deleted"]["test_execution"], 1);

    let (status, _) = call(
        &app,
        TestRequest::delete().uri(&format!("/api/v1/projects/{}", project.id)),
        Some(manager.id),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(count_rows(&pool, "test_suites", "1=1").await, 0);
}

/// (4) Bulk deletion over HTTP reports per-id errors.
#[actix_rt::test]
async fn test_bulk_delete_over_http() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let alpha = seed_project(&pool, "Alpha", admin.id).await;
    let app = create_test_app(&pool).await;

    let bulk = TestRequest::post()
        .uri("/api/v1/projects/bulk-delete")
        .set_json(json!({ "ids": [alpha.id, 9999] }));
    let (status, body) = call(&app, bulk, Some(admin.id)).await;

    assert_eq!(status, 200);
    assert_eq!(body["deleted_count"], 1);
    assert_eq!(body["errors"], json!(["Project 9999 not found"]));
    assert_eq!(body["message"], "Deleted 1 projects with 1 error(s)");

    let empty = TestRequest::post()
        .uri("/api/v1/projects/bulk-delete")
        .set_json(json!({ "ids": [] }));
    let (status, _) = call(&app, empty, Some(admin.id)).await;
    assert_eq!(status, 400);
}
