//! Test case endpoints, including duplication and execution.

use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::TransactionTrait;

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    Bug, CreateTestCaseRequest, DeleteResponse, EntityKind, ExecuteTestCaseRequest,
    ExecuteTestCaseResponse, TestCase, TestCaseQuery, TestExecution, UpdateTestCaseRequest,
};
use crate::services::{DeletionService, executions};

/// Configure test case routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_test_cases)
        .service(create_test_case)
        .service(get_test_case)
        .service(update_test_case)
        .service(delete_test_case)
        .service(duplicate_test_case)
        .service(execute_test_case);
}

#[utoipa::path(
    get,
    path = "/api/v1/test-cases",
    tag = "Test Cases",
    params(
        ("project_id" = Option<i32>, Query, description = "Filter by project"),
        ("test_suite_id" = Option<i32>, Query, description = "Filter by suite (alias: suite_id)"),
        ("requirement_id" = Option<i32>, Query, description = "Filter by linked requirement"),
        ("assigned_to" = Option<i32>, Query, description = "Filter by assignee")
    ),
    responses((status = 200, description = "Test cases", body = [TestCase]))
)]
#[get("/test-cases")]
pub async fn list_test_cases(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<TestCaseQuery>,
) -> AppResult<HttpResponse> {
    let cases = db::test_cases::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(cases.into_iter().map(TestCase::from).collect::<Vec<_>>()))
}

/// Create a test case. Without a project the suite's project is used.
#[utoipa::path(
    post,
    path = "/api/v1/test-cases",
    tag = "Test Cases",
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Test case created", body = TestCase),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Referenced project, suite or requirement not found", body = ErrorResponse)
    )
)]
#[post("/test-cases")]
pub async fn create_test_case(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let case = db::test_cases::create(&txn, &body, user.id).await?;
    txn.commit().await?;

    Ok(HttpResponse::Created().json(TestCase::from(case)))
}

#[utoipa::path(
    get,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case ID")),
    responses(
        (status = 200, description = "Test case", body = TestCase),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    )
)]
#[get("/test-cases/{id}")]
pub async fn get_test_case(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let case = db::test_cases::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestCase::from(case)))
}

#[utoipa::path(
    put,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case ID")),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Test case updated", body = TestCase),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    )
)]
#[put("/test-cases/{id}")]
pub async fn update_test_case(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let case = db::test_cases::update(&txn, path.into_inner(), &body).await?;
    txn.commit().await?;

    Ok(HttpResponse::Ok().json(TestCase::from(case)))
}

/// Delete a test case with its executions, bugs, assignments and comments.
#[utoipa::path(
    delete,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case ID")),
    responses(
        (status = 200, description = "Test case deleted", body = DeleteResponse),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    )
)]
#[delete("/test-cases/{id}")]
pub async fn delete_test_case(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(&pool, &deletion, &user, EntityKind::TestCase, path.into_inner()).await
}

/// Copy a test case as `Copy of <title>`, owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/test-cases/{id}/duplicate",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case ID")),
    responses(
        (status = 201, description = "Copy created", body = TestCase),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    )
)]
#[post("/test-cases/{id}/duplicate")]
pub async fn duplicate_test_case(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let copy = db::test_cases::duplicate(pool.connection(), path.into_inner(), user.id).await?;
    Ok(HttpResponse::Created().json(TestCase::from(copy)))
}

/// Record a run; a failed run can file a bug in the same transaction.
#[utoipa::path(
    post,
    path = "/api/v1/test-cases/{id}/execute",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case ID")),
    request_body = ExecuteTestCaseRequest,
    responses(
        (status = 201, description = "Execution recorded", body = ExecuteTestCaseResponse),
        (status = 404, description = "Test case not found", body = ErrorResponse)
    )
)]
#[post("/test-cases/{id}/execute")]
pub async fn execute_test_case(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<ExecuteTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let (execution, bug) =
        executions::execute_test_case(&pool, path.into_inner(), user.actor(), &body).await?;

    Ok(HttpResponse::Created().json(ExecuteTestCaseResponse {
        execution: TestExecution::from(execution),
        bug: bug.map(Bug::from),
    }))
}
