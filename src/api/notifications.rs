//! Notification endpoints. Users only ever see their own notifications.

use actix_web::{HttpResponse, get, post, web};

use crate::auth::CurrentUser;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{MessageResponse, Notification, NotificationQuery};

/// Configure notification routes.
/// Note: `/notifications/read-all` must be registered before `/notifications/{id}/read`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notifications)
        .service(mark_all_read)
        .service(mark_read);
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    params(("unread_only" = Option<bool>, Query, description = "Only unread notifications")),
    responses((status = 200, description = "The caller's notifications", body = [Notification]))
)]
#[get("/notifications")]
pub async fn list_notifications(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    query: web::Query<NotificationQuery>,
) -> AppResult<HttpResponse> {
    let rows = db::notifications::list_for_user(pool.connection(), user.id, &query).await?;
    Ok(HttpResponse::Ok().json(rows.into_iter().map(Notification::from).collect::<Vec<_>>()))
}

/// Mark one of the caller's notifications read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "No such notification for the caller", body = ErrorResponse)
    )
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    user: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let conn = pool.connection();

    // Other users' notifications are reported as missing.
    let existing = db::notifications::get(conn, id).await?;
    if existing.user_id != user.id {
        return Err(AppError::NotFound(format!("Notification {}", id)));
    }

    let updated = db::notifications::mark_read(conn, id).await?;
    Ok(HttpResponse::Ok().json(Notification::from(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    tag = "Notifications",
    responses((status = 200, description = "All notifications marked read", body = MessageResponse))
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(user: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let changed = db::notifications::mark_all_read(pool.connection(), user.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(format!(
        "{} notification(s) marked as read",
        changed
    ))))
}
