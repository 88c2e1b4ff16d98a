//! Assignment workflow: assigning work notifies the assignee.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;

use crate::db::{self, DbPool, ensure_exists};
use crate::entity::assignment;
use crate::error::{AppError, AppResult};
use crate::models::{Actor, CreateAssignmentRequest, EntityKind, NotificationType};

pub const NOTIFICATION_TITLE: &str = "New Assignment";

pub fn notification_message(assignment_title: &str) -> String {
    format!("You have been assigned: {}", assignment_title)
}

/// Create an assignment on behalf of a manager or admin.
///
/// The assigner is recorded as both `assigned_by` and `created_by`. The
/// assignee's notification is written in the same transaction.
pub async fn create_assignment(
    pool: &DbPool,
    actor: &Actor,
    req: &CreateAssignmentRequest,
) -> AppResult<assignment::Model> {
    if !actor.is_manager_or_admin() {
        return Err(AppError::Forbidden(
            "Only managers and admins can create assignments".to_string(),
        ));
    }
    if req.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Assignment title is required".to_string()));
    }

    let txn = pool.connection().begin().await?;

    ensure_exists(&txn, EntityKind::User, req.assigned_to).await?;
    let project_id = resolve_project(&txn, req).await?;

    let assignment = db::assignments::insert(&txn, req, project_id, actor.id).await?;
    db::notifications::create(
        &txn,
        req.assigned_to,
        NOTIFICATION_TITLE,
        &notification_message(&assignment.title),
        NotificationType::Info,
    )
    .await?;

    txn.commit().await?;

    info!(
        "Assignment {} created by user {} for user {}",
        assignment.id, actor.id, req.assigned_to
    );

    Ok(assignment)
}

/// The explicit project, else the project of the test case, else that of the
/// bug's test case. Referenced parents must exist.
async fn resolve_project<C: ConnectionTrait>(
    db: &C,
    req: &CreateAssignmentRequest,
) -> AppResult<Option<i32>> {
    if let Some(project_id) = req.project_id {
        ensure_exists(db, EntityKind::Project, project_id).await?;
    }

    let mut derived = None;
    if let Some(test_case_id) = req.test_case_id {
        derived = db::test_cases::get(db, test_case_id).await?.project_id;
    }
    if let Some(bug_id) = req.bug_id {
        let bug = db::bugs::get(db, bug_id).await?;
        if derived.is_none()
            && let Some(test_case_id) = bug.test_case_id
        {
            derived = db::test_cases::get(db, test_case_id).await?.project_id;
        }
    }

    Ok(req.project_id.or(derived))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_message() {
        assert_eq!(
            notification_message("Regression pass"),
            "You have been assigned: Regression pass"
        );
    }
}
