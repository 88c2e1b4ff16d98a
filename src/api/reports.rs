//! Dashboard and report endpoints.

use actix_web::{HttpResponse, get, web};

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{DashboardStats, ReportSummary};
use crate::services::reporting;

/// Configure report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard).service(report_summary);
}

/// Totals, overall pass rate and the latest executions.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Reports",
    responses((status = 200, description = "Dashboard statistics", body = DashboardStats))
)]
#[get("/dashboard")]
pub async fn dashboard(_user: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(reporting::dashboard(&pool).await?))
}

/// Execution summary across all projects (manager/admin).
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "Report summary", body = ReportSummary),
        (status = 403, description = "Manager or admin role required", body = ErrorResponse)
    )
)]
#[get("/reports")]
pub async fn report_summary(
    user: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !user.is_manager_or_admin() {
        return Err(AppError::Forbidden(
            "Only managers and admins can view reports".to_string(),
        ));
    }
    Ok(HttpResponse::Ok().json(reporting::summary(&pool).await?))
}
