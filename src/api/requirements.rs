//! Requirement endpoints and test case linking.

use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::TransactionTrait;

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    BulkDeleteRequest, BulkDeleteResponse, CandidateTestCase, CreateRequirementRequest,
    DeleteResponse, EntityKind, LinkTestCasesRequest, LinkTestCasesResponse, Requirement,
    RequirementDetail, RequirementQuery, TestCase, TestCaseQuery, UpdateRequirementRequest,
};
use crate::services::DeletionService;

/// Configure requirement routes.
/// Note: `/requirements/bulk-delete` must be registered before `/requirements/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_requirements)
        .service(create_requirement)
        .service(bulk_delete_requirements)
        .service(get_requirement)
        .service(update_requirement)
        .service(delete_requirement)
        .service(candidate_test_cases)
        .service(link_test_cases);
}

#[utoipa::path(
    get,
    path = "/api/v1/requirements",
    tag = "Requirements",
    params(("project_id" = Option<i32>, Query, description = "Filter by project")),
    responses((status = 200, description = "Requirements", body = [Requirement]))
)]
#[get("/requirements")]
pub async fn list_requirements(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<RequirementQuery>,
) -> AppResult<HttpResponse> {
    let requirements = db::requirements::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(
        requirements
            .into_iter()
            .map(Requirement::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/requirements",
    tag = "Requirements",
    request_body = CreateRequirementRequest,
    responses(
        (status = 201, description = "Requirement created", body = Requirement),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[post("/requirements")]
pub async fn create_requirement(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateRequirementRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let requirement = db::requirements::create(&txn, &body, user.id).await?;
    txn.commit().await?;

    Ok(HttpResponse::Created().json(Requirement::from(requirement)))
}

/// A requirement with the test cases linked to it.
#[utoipa::path(
    get,
    path = "/api/v1/requirements/{id}",
    tag = "Requirements",
    params(("id" = i32, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Requirement with linked cases", body = RequirementDetail),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[get("/requirements/{id}")]
pub async fn get_requirement(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    let requirement = db::requirements::get(conn, id).await?;
    let test_cases = db::requirements::linked_test_cases(conn, id).await?;

    Ok(HttpResponse::Ok().json(RequirementDetail {
        requirement: Requirement::from(requirement),
        test_cases: test_cases.into_iter().map(TestCase::from).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/requirements/{id}",
    tag = "Requirements",
    params(("id" = i32, Path, description = "Requirement ID")),
    request_body = UpdateRequirementRequest,
    responses(
        (status = 200, description = "Requirement updated", body = Requirement),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[put("/requirements/{id}")]
pub async fn update_requirement(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateRequirementRequest>,
) -> AppResult<HttpResponse> {
    let requirement = db::requirements::update(pool.connection(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(Requirement::from(requirement)))
}

/// Delete a requirement (admin, manager or creator); linked cases are unlinked.
#[utoipa::path(
    delete,
    path = "/api/v1/requirements/{id}",
    tag = "Requirements",
    params(("id" = i32, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Requirement deleted", body = DeleteResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[delete("/requirements/{id}")]
pub async fn delete_requirement(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(
        &pool,
        &deletion,
        &user,
        EntityKind::Requirement,
        path.into_inner(),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/requirements/bulk-delete",
    tag = "Requirements",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Bulk deletion outcome", body = BulkDeleteResponse),
        (status = 400, description = "No ids given", body = ErrorResponse)
    )
)]
#[post("/requirements/bulk-delete")]
pub async fn bulk_delete_requirements(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    super::delete_many(
        &pool,
        &deletion,
        &user,
        EntityKind::Requirement,
        body.into_inner(),
        "requirements",
    )
    .await
}

/// Test cases of the requirement's project, flagged when linked.
#[utoipa::path(
    get,
    path = "/api/v1/requirements/{id}/test-cases",
    tag = "Requirements",
    params(("id" = i32, Path, description = "Requirement ID")),
    responses(
        (status = 200, description = "Candidate test cases", body = [CandidateTestCase]),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[get("/requirements/{id}/test-cases")]
pub async fn candidate_test_cases(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    let requirement = db::requirements::get(conn, id).await?;
    let cases = match requirement.project_id {
        Some(project_id) => {
            db::test_cases::list(
                conn,
                &TestCaseQuery {
                    project_id: Some(project_id),
                    ..Default::default()
                },
            )
            .await?
        }
        None => db::requirements::linked_test_cases(conn, id).await?,
    };

    let candidates: Vec<CandidateTestCase> = cases
        .into_iter()
        .map(|case| CandidateTestCase {
            is_linked: case.requirement_id == Some(id),
            test_case: TestCase::from(case),
        })
        .collect();

    Ok(HttpResponse::Ok().json(candidates))
}

/// Replace the requirement's linked test cases.
#[utoipa::path(
    post,
    path = "/api/v1/requirements/{id}/link-test-cases",
    tag = "Requirements",
    params(("id" = i32, Path, description = "Requirement ID")),
    request_body = LinkTestCasesRequest,
    responses(
        (status = 200, description = "Links replaced", body = LinkTestCasesResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[post("/requirements/{id}/link-test-cases")]
pub async fn link_test_cases(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<LinkTestCasesRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let linked_count =
        db::requirements::link_test_cases(&txn, path.into_inner(), &body.test_case_ids).await?;
    txn.commit().await?;

    Ok(HttpResponse::Ok().json(LinkTestCasesResponse {
        success: true,
        linked_count,
    }))
}
