//! User endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{
    BulkDeleteRequest, BulkDeleteResponse, CreateUserRequest, DeleteResponse, EntityKind,
    UpdateUserRequest, User, UserStats,
};
use crate::services::{DeletionService, reporting, user_admin};

/// Configure user routes.
/// Note: `/users/stats` and `/users/bulk-delete` must be registered before `/users/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(create_user)
        .service(user_stats)
        .service(bulk_delete_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(toggle_active);
}

/// List users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Unknown or inactive user", body = ErrorResponse)
    )
)]
#[get("/users")]
pub async fn list_users(_user: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let users = db::users::list(pool.connection()).await?;
    Ok(HttpResponse::Ok().json(users.into_iter().map(User::from).collect::<Vec<_>>()))
}

/// Create a user (admin only). Only one admin may exist.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Username, email or admin already taken", body = ErrorResponse)
    )
)]
#[post("/users")]
pub async fn create_user(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let created = user_admin::create_user(&pool, user.actor(), &body).await?;
    Ok(HttpResponse::Created().json(User::from(created)))
}

/// User counts by role (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/users/stats",
    tag = "Users",
    responses(
        (status = 200, description = "User statistics", body = UserStats),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[get("/users/stats")]
pub async fn user_stats(user: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can view user statistics".to_string(),
        ));
    }
    Ok(HttpResponse::Ok().json(reporting::user_stats(&pool).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[get("/users/{id}")]
pub async fn get_user(
    _user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let found = db::users::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(User::from(found)))
}

/// Update a user. Non-admins may only edit themselves and never their role.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 409, description = "Admin already exists", body = ErrorResponse)
    )
)]
#[put("/users/{id}")]
pub async fn update_user(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let updated = user_admin::update_user(&pool, user.actor(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(User::from(updated)))
}

/// Delete a user and everything they own (admin only, never yourself).
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DeleteResponse),
        (status = 403, description = "Not allowed or self-deletion", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let report = deletion
        .delete_user(&pool, path.into_inner(), user.actor())
        .await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: "User deleted successfully".to_string(),
        report,
    }))
}

/// Activate or deactivate a user (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/toggle-active",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with the new active flag", body = User),
        (status = 403, description = "Not allowed", body = ErrorResponse)
    )
)]
#[post("/users/{id}/toggle-active")]
pub async fn toggle_active(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let updated = user_admin::toggle_active(&pool, user.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(User::from(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/bulk-delete",
    tag = "Users",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Bulk deletion outcome", body = BulkDeleteResponse),
        (status = 400, description = "No ids given", body = ErrorResponse),
        (status = 403, description = "Admin role required or self in batch", body = ErrorResponse)
    )
)]
#[post("/users/bulk-delete")]
pub async fn bulk_delete_users(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    deletion: web::Data<DeletionService>,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    super::delete_many(&pool, &deletion, &user, EntityKind::User, body.into_inner(), "users").await
}
