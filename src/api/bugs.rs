//! Bug endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::TransactionTrait;

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{
    Bug, BugQuery, CommentTarget, CreateBugRequest, DeleteResponse, EntityKind, UpdateBugRequest,
    UpdateBugStatusRequest,
};
use crate::services::DeletionService;

/// Configure bug routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_bugs)
        .service(create_bug)
        .service(get_bug)
        .service(update_bug)
        .service(delete_bug)
        .service(update_bug_status);
}

#[utoipa::path(
    get,
    path = "/api/v1/bugs",
    tag = "Bugs",
    params(
        ("test_case_id" = Option<i32>, Query, description = "Filter by test case"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses((status = 200, description = "Bugs", body = [Bug]))
)]
#[get("/bugs")]
pub async fn list_bugs(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<BugQuery>,
) -> AppResult<HttpResponse> {
    let bugs = db::bugs::list(pool.connection(), &query).await?;
    Ok(HttpResponse::Ok().json(bugs.into_iter().map(Bug::from).collect::<Vec<_>>()))
}

#[utoipa::path(
    post,
    path = "/api/v1/bugs",
    tag = "Bugs",
    request_body = CreateBugRequest,
    responses(
        (status = 201, description = "Bug reported", body = Bug),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 404, description = "Test case or assignee not found", body = ErrorResponse)
    )
)]
#[post("/bugs")]
pub async fn create_bug(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateBugRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let bug = db::bugs::create(&txn, &body, user.id).await?;
    txn.commit().await?;

    Ok(HttpResponse::Created().json(Bug::from(bug)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bugs/{id}",
    tag = "Bugs",
    params(("id" = i32, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Bug", body = Bug),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    )
)]
#[get("/bugs/{id}")]
pub async fn get_bug(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let bug = db::bugs::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Bug::from(bug)))
}

#[utoipa::path(
    put,
    path = "/api/v1/bugs/{id}",
    tag = "Bugs",
    params(("id" = i32, Path, description = "Bug ID")),
    request_body = UpdateBugRequest,
    responses(
        (status = 200, description = "Bug updated", body = Bug),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    )
)]
#[put("/bugs/{id}")]
pub async fn update_bug(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateBugRequest>,
) -> AppResult<HttpResponse> {
    let txn = pool.connection().begin().await?;
    let bug = db::bugs::update(&txn, path.into_inner(), &body).await?;
    txn.commit().await?;

    Ok(HttpResponse::Ok().json(Bug::from(bug)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{id}",
    tag = "Bugs",
    params(("id" = i32, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Bug deleted", body = DeleteResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    )
)]
#[delete("/bugs/{id}")]
pub async fn delete_bug(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    super::delete_one(&pool, &deletion, &user, EntityKind::Bug, path.into_inner()).await
}

/// Change a bug's status; a non-empty comment is attached to the bug.
#[utoipa::path(
    post,
    path = "/api/v1/bugs/{id}/status",
    tag = "Bugs",
    params(("id" = i32, Path, description = "Bug ID")),
    request_body = UpdateBugStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Bug),
        (status = 400, description = "Status missing", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    )
)]
#[post("/bugs/{id}/status")]
pub async fn update_bug_status(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateBugStatusRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if body.status.trim().is_empty() {
        return Err(AppError::InvalidInput("Status is required".to_string()));
    }

    let txn = pool.connection().begin().await?;
    let bug = db::bugs::set_status(&txn, id, body.status.trim()).await?;
    if let Some(comment) = body.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        db::comments::create(&txn, CommentTarget::Bug(id), comment, user.id).await?;
    }
    txn.commit().await?;

    Ok(HttpResponse::Ok().json(Bug::from(bug)))
}
