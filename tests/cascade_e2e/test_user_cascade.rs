//! E2E tests: User deletion.

use testledger_lib::db;
use testledger_lib::models::{CommentTarget, EntityKind, ExecutionStatus, Role};
use testledger_lib::services::DeletionError;

use super::test_helpers::*;

/// (1) A user's executions go with them; cases they wrote lose their author.
#[actix_rt::test]
async fn test_user_delete_nulls_authorship_and_removes_executions() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let bob = seed_user(&pool, "bob", Role::Tester).await;

    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, bob.id).await;
    let run = seed_execution(&pool, case.id, bob.id, ExecutionStatus::Fail).await;
    seed_comment(&pool, CommentTarget::TestExecution(run.id), admin.id).await;
    seed_comment(&pool, CommentTarget::TestCase(case.id), bob.id).await;
    seed_assignment(&pool, "Retest login", bob.id, Some(project.id), Some(case.id), admin.id).await;

    let report = deletion_service()
        .delete_user(&pool, bob.id, &actor(&admin))
        .await
        .expect("User deletion should succeed");

    assert_eq!(report.deleted_count(EntityKind::User), 1);
    assert_eq!(report.deleted_count(EntityKind::TestExecution), 1);
    assert_eq!(report.deleted_count(EntityKind::Assignment), 1);
    assert_eq!(report.deleted_count(EntityKind::TestCase), 0);
    assert_eq!(report.failures().count(), 0, "No step should fail: {:?}", report.steps);

    assert_eq!(
        count_rows(&pool, "test_cases", &format!("id = {} AND created_by IS NULL", case.id)).await,
        1
    );
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 0);
    // The execution's comment goes with it; bob's own comment loses its author.
    assert_eq!(count_rows(&pool, "comments", "created_by IS NULL").await, 1);
    assert_eq!(count_rows(&pool, "comments", "1=1").await, 1);

    let users = db::users::list(pool.connection())
        .await
        .expect("list users");
    assert!(users.iter().all(|u| u.username != "bob"));
    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
}

/// (2) Self-deletion is refused before anything is touched.
#[actix_rt::test]
async fn test_self_deletion_is_refused() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    seed_suite(&pool, "Login", project.id, None).await;

    let result = deletion_service()
        .delete_user(&pool, admin.id, &actor(&admin))
        .await;

    assert!(matches!(result, Err(DeletionError::SelfDeletion)));
    assert_eq!(count_rows(&pool, "users", "1=1").await, 1);
    assert_eq!(
        count_rows(&pool, "projects", &format!("created_by = {}", admin.id)).await,
        1
    );
}

/// (3) Only admins delete users.
#[actix_rt::test]
async fn test_manager_cannot_delete_user() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;

    let result = deletion_service()
        .delete_user(&pool, tester.id, &actor(&manager))
        .await;

    assert!(matches!(result, Err(DeletionError::AccessDenied(_))));
    assert_eq!(count_rows(&pool, "users", "1=1").await, 2);
}

/// (4) A user's notifications and reported bugs are removed with them.
#[actix_rt::test]
async fn test_user_delete_removes_notifications_and_reported_bugs() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;
    let bug = seed_bug(&pool, "Button misaligned", case.id, tester.id).await;
    seed_comment(&pool, CommentTarget::Bug(bug.id), admin.id).await;

    let mut req = assignment_request("Verify fix", tester.id);
    req.bug_id = Some(bug.id);
    testledger_lib::services::assignments::create_assignment(&pool, &actor(&admin), &req)
        .await
        .expect("assignment with notification");
    assert_eq!(
        count_rows(&pool, "notifications", &format!("user_id = {}", tester.id)).await,
        1
    );

    let report = deletion_service()
        .delete_user(&pool, tester.id, &actor(&admin))
        .await
        .expect("User deletion should succeed");

    assert_eq!(report.deleted_count(EntityKind::Notification), 1);
    assert_eq!(report.deleted_count(EntityKind::Bug), 1);
    assert_eq!(report.deleted_count(EntityKind::Comment), 1);
    assert_eq!(report.deleted_count(EntityKind::Assignment), 1);
    assert_eq!(count_rows(&pool, "notifications", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "test_cases", "1=1").await, 1);
}
