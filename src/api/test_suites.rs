//! Test suite endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::TransactionTrait;

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    CreateTestSuiteRequest, DeleteResponse, EntityKind, TestCase, TestCaseQuery, TestSuite,
    TestSuiteQuery, UpdateTestSuiteRequest,
};
use crate::services::DeletionService;

/// Configure test suite routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_test_suites)
        .service(create_test_suite)
        .service(get_test_suite)
        .service(update_test_suite)
        .service(delete_test_suite)
        .service(suite_test_cases);
}

#[utoipa::path(
    get,
    path = "/api/v1/test-suites",
    tag = "Test Suites",
    params(("project_id" = Option<i32>, Query, description = "Only suites of this project")),
    responses((status = 200, description = "Test suites", body = [TestSuite]))
)]
#[get("/test-suites")]
pub async fn list_test_suites(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<TestSuiteQuery>,
) -> AppResult<HttpResponse> {
    let suites = db::test_suites::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(suites.into_iter().map(TestSuite::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    post,
    path = "/api/v1/test-suites",
    tag = "Test Suites",
    request_body = CreateTestSuiteRequest,
    responses(
        (status = 201, description = "Test suite created", body = TestSuite),
        (status = 400, description = "Invalid parent suite", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[post("/test-suites")]
pub async fn create_test_suite(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestSuiteRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let suite = db::test_suites::create(&txn, &body).await?;
    txn.commit().await?;

    Ok(HttpResponse::Created().json(TestSuite::from(suite)))
}

#[utoipa::path(
    get,
    path = "/api/v1/test-suites/{id}",
    tag = "Test Suites",
    params(("id" = i32, Path, description = "Test suite ID")),
    responses(
        (status = 200, description = "Test suite", body = TestSuite),
        (status = 404, description = "Test suite not found", body = ErrorResponse)
    )
)]
#[get("/test-suites/{id}")]
pub async fn get_test_suite(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let suite = db::test_suites::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestSuite::from(suite)))
}

#[utoipa::path(
    put,
    path = "/api/v1/test-suites/{id}",
    tag = "Test Suites",
    params(("id" = i32, Path, description = "Test suite ID")),
    request_body = UpdateTestSuiteRequest,
    responses(
        (status = 200, description = "Test suite updated", body = TestSuite),
        (status = 404, description = "Test suite not found", body = ErrorResponse)
    )
)]
#[put("/test-suites/{id}")]
pub async fn update_test_suite(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateTestSuiteRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let suite = db::test_suites::update(&txn, path.into_inner(), &body).await?;
    txn.commit().await?;

    Ok(HttpResponse::Ok().json(TestSuite::from(suite)))
}

/// Delete a suite with its test cases; child suites are detached.
#[utoipa::path(
    delete,
    path = "/api/v1/test-suites/{id}",
    tag = "Test Suites",
    params(("id" = i32, Path, description = "Test suite ID")),
    responses(
        (status = 200, description = "Test suite deleted", body = DeleteResponse),
        (status = 404, description = "Test suite not found", body = ErrorResponse)
    )
)]
#[delete("/test-suites/{id}")]
pub async fn delete_test_suite(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(&pool, &deletion, &user, EntityKind::TestSuite, path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/test-suites/{id}/test-cases",
    tag = "Test Suites",
    params(("id" = i32, Path, description = "Test suite ID")),
    responses(
        (status = 200, description = "Test cases in the suite", body = [TestCase]),
        (status = 404, description = "Test suite not found", body = ErrorResponse)
    )
)]
#[get("/test-suites/{id}/test-cases")]
pub async fn suite_test_cases(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let suite_id = path.into_inner();
    let conn = pool.connection();
    db::test_suites::get(conn, suite_id).await?;

    let cases = db::test_cases::list(
        conn,
        &TestCaseQuery {
            test_suite_id: Some(suite_id),
            ..Default::default()
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(cases.into_iter().map(TestCase::from).collect::<Vec<_>>()))
}
