//! Test execution endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use sea_orm::TransactionTrait;

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    BulkDeleteRequest, BulkDeleteResponse, Comment, CommentTarget, CreateCommentRequest,
    DeleteResponse, EntityKind, ExecutionQuery, TestExecution,
};
use crate::services::DeletionService;

/// Configure test execution routes.
/// Note: `/test-executions/bulk-delete` must be registered before `/test-executions/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_test_executions)
        .service(bulk_delete_test_executions)
        .service(delete_test_execution)
        .service(add_execution_comment);
}

/// List executions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/test-executions",
    tag = "Test Executions",
    params(
        ("test_case_id" = Option<i32>, Query, description = "Filter by test case"),
        ("project_id" = Option<i32>, Query, description = "Filter by the test case's project"),
        ("executed_by" = Option<i32>, Query, description = "Filter by executor"),
        ("limit" = Option<u64>, Query, description = "Maximum rows (default: 100)")
    ),
    responses((status = 200, description = "Executions", body = [TestExecution]))
)]
#[get("/test-executions")]
pub async fn list_test_executions(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<ExecutionQuery>,
) -> AppResult<HttpResponse> {
    let executions = db::test_executions::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(
        executions
            .into_iter()
            .map(TestExecution::from)
            .collect::<Vec<_>>(),
    ))
}

/// Delete an execution (admin, manager or executor) with its comments.
#[utoipa::path(
    delete,
    path = "/api/v1/test-executions/{id}",
    tag = "Test Executions",
    params(("id" = i32, Path, description = "Execution ID")),
    responses(
        (status = 200, description = "Execution deleted", body = DeleteResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Execution not found", body = ErrorResponse)
    )
)]
#[delete("/test-executions/{id}")]
pub async fn delete_test_execution(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(
        &pool,
        &deletion,
        &user,
        EntityKind::TestExecution,
        path.into_inner(),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/test-executions/bulk-delete",
    tag = "Test Executions",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Bulk deletion outcome", body = BulkDeleteResponse),
        (status = 400, description = "No ids given", body = ErrorResponse)
    )
)]
#[post("/test-executions/bulk-delete")]
pub async fn bulk_delete_test_executions(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    super::delete_many(
        &pool,
        &deletion,
        &user,
        EntityKind::TestExecution,
        body.into_inner(),
        "test executions",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/test-executions/{id}/comments",
    tag = "Test Executions",
    params(("id" = i32, Path, description = "Execution ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Empty comment", body = ErrorResponse),
        (status = 404, description = "Execution not found", body = ErrorResponse)
    )
)]
#[post("/test-executions/{id}/comments")]
pub async fn add_execution_comment(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let target = CommentTarget::TestExecution(path.into_inner());

    let txn = pool.connection().begin().await?;
    let comment = db::comments::create(&txn, target, &body.content, user.id).await?;
    txn.commit().await?;

    Ok(HttpResponse::Created().json(Comment::from(comment)))
}
