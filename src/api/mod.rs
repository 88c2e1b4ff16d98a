//! API endpoint modules.
//!
//! Every handler resolves the acting user through [`CurrentUser`]; the
//! deletion handlers share the helpers below.

pub mod assignments;
pub mod bugs;
pub mod health;
pub mod notifications;
pub mod openapi;
pub mod projects;
pub mod reports;
pub mod requirements;
pub mod test_cases;
pub mod test_executions;
pub mod test_suites;
pub mod users;

use actix_web::{HttpResponse, web};

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{BulkDeleteRequest, BulkDeleteResponse, DeleteResponse, EntityKind};
use crate::services::DeletionService;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Register every `/api/v1` route.
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(users::configure_routes)
        .configure(projects::configure_routes)
        .configure(test_suites::configure_routes)
        .configure(test_cases::configure_routes)
        .configure(test_executions::configure_routes)
        .configure(bugs::configure_routes)
        .configure(requirements::configure_routes)
        .configure(assignments::configure_routes)
        .configure(notifications::configure_routes)
        .configure(reports::configure_routes);
}

/// Cascade-delete one row and answer with the step report.
pub(crate) async fn delete_one(
    pool: &DbPool,
    deletion: &DeletionService,
    user: &CurrentUser,
    kind: EntityKind,
    id: i32,
) -> AppResult<HttpResponse> {
    let report = deletion.delete(pool, kind, id, user.actor()).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: format!("{} deleted successfully", kind.label()),
        report,
    }))
}

/// Cascade-delete many rows of one kind.
pub(crate) async fn delete_many(
    pool: &DbPool,
    deletion: &DeletionService,
    user: &CurrentUser,
    kind: EntityKind,
    body: BulkDeleteRequest,
    noun: &str,
) -> AppResult<HttpResponse> {
    let summary = deletion
        .bulk_delete(pool, kind, &body.ids, user.actor())
        .await?;

    Ok(HttpResponse::Ok().json(BulkDeleteResponse::from_summary(summary, noun)))
}
