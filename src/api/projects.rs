//! Project endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{
    BulkDeleteRequest, BulkDeleteResponse, CreateProjectRequest, DeleteResponse, EntityKind,
    Project, ProjectQuery, ProjectReport, TestCase, TestCaseQuery, UpdateProjectRequest,
};
use crate::services::{DeletionService, reporting};

/// Configure project routes.
/// Note: `/projects/bulk-delete` must be registered before `/projects/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_projects)
        .service(create_project)
        .service(bulk_delete_projects)
        .service(get_project)
        .service(update_project)
        .service(delete_project)
        .service(project_test_cases)
        .service(project_report);
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    params(("status" = Option<String>, Query, description = "Only projects with this status")),
    responses((status = 200, description = "Projects", body = [Project]))
)]
#[get("/projects")]
pub async fn list_projects(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<ProjectQuery>,
) -> AppResult<HttpResponse> {
    let projects = db::projects::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(projects.into_iter().map(Project::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Name missing", body = ErrorResponse)
    )
)]
#[post("/projects")]
pub async fn create_project(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let project = db::projects::create(pool.connection(), &body, user.id).await?;
    Ok(HttpResponse::Created().json(Project::from(project)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[get("/projects/{id}")]
pub async fn get_project(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let project = db::projects::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Project::from(project)))
}

/// Update a project (admin, manager or creator).
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[put("/projects/{id}")]
pub async fn update_project(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    let existing = db::projects::get(conn, id).await?;
    if !user.can_manage(existing.created_by) {
        return Err(AppError::Forbidden(
            "Only admins, managers or the creator can edit this project".to_string(),
        ));
    }

    let project = db::projects::update(conn, id, &body).await?;
    Ok(HttpResponse::Ok().json(Project::from(project)))
}

/// Delete a project with all suites, cases, requirements and assignments.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = DeleteResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let report = deletion
        .delete_project(&pool, path.into_inner(), user.actor())
        .await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
        report,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/bulk-delete",
    tag = "Projects",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Bulk deletion outcome", body = BulkDeleteResponse),
        (status = 400, description = "No ids given", body = ErrorResponse),
        (status = 403, description = "Admin or manager role required", body = ErrorResponse)
    )
)]
#[post("/projects/bulk-delete")]
pub async fn bulk_delete_projects(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    super::delete_many(
        &pool,
        &deletion,
        &user,
        EntityKind::Project,
        body.into_inner(),
        "projects",
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/test-cases",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Test cases of the project", body = [TestCase]),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[get("/projects/{id}/test-cases")]
pub async fn project_test_cases(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let conn = pool.connection();
    db::projects::get(conn, project_id).await?;

    let cases = db::test_cases::list(
        conn,
        &TestCaseQuery {
            project_id: Some(project_id),
            ..Default::default()
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(cases.into_iter().map(TestCase::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/report",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project totals", body = ProjectReport),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[get("/projects/{id}/report")]
pub async fn project_report(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let report = reporting::project_report(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}
