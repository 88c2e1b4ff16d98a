//! Assignment endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::entity::assignment;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{
    Actor, Assignment, AssignmentQuery, BulkDeleteRequest, BulkDeleteResponse,
    CreateAssignmentRequest, DeleteResponse, EntityKind, UpdateAssignmentRequest,
};
use crate::services::{DeletionService, assignments};

/// Configure assignment routes.
/// Note: `/assignments/bulk-delete` must be registered before `/assignments/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_assignments)
        .service(create_assignment)
        .service(bulk_delete_assignments)
        .service(update_assignment)
        .service(delete_assignment)
        .service(complete_assignment);
}

/// Creator, assignee, or a manager/admin.
fn ensure_participant(actor: &Actor, existing: &assignment::Model) -> AppResult<()> {
    if actor.can_manage(existing.created_by) || existing.assigned_to == Some(actor.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the assignee, the creator, managers or admins can change this assignment"
                .to_string(),
        ))
    }
}

/// List assignments. Managers and admins see all; others see their own.
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    tag = "Assignments",
    params(
        ("assigned_to" = Option<i32>, Query, description = "Filter by assignee"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses((status = 200, description = "Assignments", body = [Assignment]))
)]
#[get("/assignments")]
pub async fn list_assignments(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<AssignmentQuery>,
) -> AppResult<HttpResponse> {
    let mut query = query.into_inner();
    if !user.is_manager_or_admin() {
        query.assigned_to = Some(user.id);
    }

    let rows = db::assignments::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(rows.into_iter().map(Assignment::from).collect::<Vec<_>>()))
}

/// Assign work (manager/admin). The assignee is notified.
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    tag = "Assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Manager or admin role required", body = ErrorResponse),
        (status = 404, description = "Assignee or referenced record not found", body = ErrorResponse)
    )
)]
#[post("/assignments")]
pub async fn create_assignment(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateAssignmentRequest>,
) -> AppResult<HttpResponse> {
    let created = assignments::create_assignment(&pool, user.actor(), &body).await?;
    Ok(HttpResponse::Created().json(Assignment::from(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/assignments/{id}",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[put("/assignments/{id}")]
pub async fn update_assignment(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateAssignmentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    let existing = db::assignments::get(conn, id).await?;
    ensure_participant(user.actor(), &existing)?;

    let updated = db::assignments::update(conn, id, &body).await?;
    Ok(HttpResponse::Ok().json(Assignment::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{id}",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = DeleteResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[delete("/assignments/{id}")]
pub async fn delete_assignment(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(
        &pool,
        &deletion,
        &user,
        EntityKind::Assignment,
        path.into_inner(),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/complete",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment completed", body = Assignment),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    )
)]
#[post("/assignments/{id}/complete")]
pub async fn complete_assignment(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    let existing = db::assignments::get(conn, id).await?;
    ensure_participant(user.actor(), &existing)?;

    let completed = db::assignments::complete(conn, id).await?;
    Ok(HttpResponse::Ok().json(Assignment::from(completed)))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/bulk-delete",
    tag = "Assignments",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Bulk deletion outcome", body = BulkDeleteResponse),
        (status = 400, description = "No ids given", body = ErrorResponse)
    )
)]
#[post("/assignments/bulk-delete")]
pub async fn bulk_delete_assignments(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    super::delete_many(
        &pool,
        &deletion,
        &user,
        EntityKind::Assignment,
        body.into_inner(),
        "assignments",
    )
    .await
}
