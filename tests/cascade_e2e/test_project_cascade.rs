//! E2E tests: Project deletion cascades through suites, cases and their dependents.

use testledger_lib::models::{CommentTarget, EntityKind, ExecutionStatus, Role};
use testledger_lib::services::cascade::{
    CascadeEngine, DependencyGraph, REFERENCES, StepAction, StepOutcome,
};
use testledger_lib::services::{DeletionError, DeletionService};

use super::test_helpers::*;

/// (1) Deleting a project removes everything hanging off it and nothing else.
#[actix_rt::test]
async fn test_project_delete_removes_whole_tree() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;

    let alpha = seed_project(&pool, "Alpha", admin.id).await;
    let login = seed_suite(&pool, "Login", alpha.id, None).await;
    let sso = seed_suite(&pool, "SSO", alpha.id, Some(login.id)).await;
    let req = seed_requirement(&pool, "Users can sign in", alpha.id, admin.id).await;

    let linked = seed_case(&pool, "Valid password", login.id, Some(req.id), admin.id).await;
    let buggy = seed_case(&pool, "Locked account", login.id, None, admin.id).await;
    let executed = seed_case(&pool, "SAML redirect", sso.id, None, tester.id).await;

    let bug = seed_bug(&pool, "Lockout message missing", buggy.id, tester.id).await;
    let run = seed_execution(&pool, executed.id, tester.id, ExecutionStatus::Pass).await;
    seed_comment(&pool, CommentTarget::Bug(bug.id), tester.id).await;
    seed_comment(&pool, CommentTarget::TestExecution(run.id), tester.id).await;
    seed_assignment(&pool, "Run login suite", tester.id, Some(alpha.id), Some(linked.id), admin.id)
        .await;

    let beta = seed_project(&pool, "Beta", admin.id).await;
    let beta_suite = seed_suite(&pool, "Checkout", beta.id, None).await;
    let beta_case = seed_case(&pool, "Pay by card", beta_suite.id, None, admin.id).await;
    seed_execution(&pool, beta_case.id, tester.id, ExecutionStatus::Fail).await;

    let report = deletion_service()
        .delete_project(&pool, alpha.id, &actor(&admin))
        .await
        .expect("Project deletion should succeed");

    assert_eq!(report.deleted_count(EntityKind::Project), 1);
    assert_eq!(report.deleted_count(EntityKind::TestSuite), 2);
    assert_eq!(report.deleted_count(EntityKind::TestCase), 3);
    assert_eq!(report.deleted_count(EntityKind::Requirement), 1);
    assert_eq!(report.deleted_count(EntityKind::Bug), 1);
    assert_eq!(report.deleted_count(EntityKind::TestExecution), 1);
    assert_eq!(report.deleted_count(EntityKind::Comment), 2);
    assert_eq!(report.deleted_count(EntityKind::Assignment), 1);
    assert_eq!(report.failures().count(), 0, "No step should fail: {:?}", report.steps);
    assert_eq!(report.skipped().count(), 0);
    assert!(matches!(
        report.steps.last().map(|s| (s.action, &s.outcome)),
        Some((StepAction::DeleteRoot, StepOutcome::Applied { rows: 1 }))
    ));

    assert_eq!(count_rows(&pool, "projects", &format!("id = {}", alpha.id)).await, 0);
    assert_eq!(count_rows(&pool, "test_suites", &format!("project_id = {}", alpha.id)).await, 0);
    assert_eq!(count_rows(&pool, "requirements", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "bugs", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "comments", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "assignments", "1=1").await, 0);

    // Users and the other project are untouched.
    assert_eq!(count_rows(&pool, "users", "1=1").await, 2);
    assert_eq!(count_rows(&pool, "projects", &format!("id = {}", beta.id)).await, 1);
    assert_eq!(count_rows(&pool, "test_cases", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 1);
}

/// (2) A missing project is reported as not found and changes nothing.
#[actix_rt::test]
async fn test_missing_project_is_not_found() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    seed_project(&pool, "Alpha", admin.id).await;

    let result = deletion_service()
        .delete_project(&pool, 9999, &actor(&admin))
        .await;

    assert!(matches!(
        result,
        Err(DeletionError::NotFound { kind: EntityKind::Project, id: 9999 })
    ));
    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
}

/// (3) A tester cannot delete a project created by someone else.
#[actix_rt::test]
async fn test_tester_cannot_delete_foreign_project() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", manager.id).await;
    seed_suite(&pool, "Login", project.id, None).await;

    let result = deletion_service()
        .delete_project(&pool, project.id, &actor(&tester))
        .await;

    assert!(matches!(result, Err(DeletionError::AccessDenied(_))));
    assert_eq!(count_rows(&pool, "test_suites", "1=1").await, 1);
}

/// (4) When the root row cannot be deleted the whole transaction rolls back.
#[actix_rt::test]
async fn test_root_failure_rolls_back_dependents() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;
    seed_execution(&pool, case.id, admin.id, ExecutionStatus::Pass).await;

    // Without the suite edge the suites survive and keep the project referenced.
    let references = REFERENCES
        .iter()
        .copied()
        .filter(|r| !(r.from == EntityKind::TestSuite && r.column == "project_id"))
        .collect();
    let graph = DependencyGraph::new(references).expect("graph without suite edge is acyclic");
    let service = DeletionService::new(CascadeEngine::new(graph), TEST_BULK_ERROR_LIMIT);

    let result = service
        .delete_project(&pool, project.id, &actor(&admin))
        .await;

    assert!(
        matches!(result, Err(DeletionError::Persistence(_))),
        "Root deletion should fail on the suite foreign key: {:?}",
        result.map(|r| r.steps)
    );
    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "test_cases", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 1);
}

/// (5) Nested suites are collected and removed with their parent.
#[actix_rt::test]
async fn test_suite_delete_clears_child_suite_parent() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let parent = seed_suite(&pool, "Login", project.id, None).await;
    let child = seed_suite(&pool, "SSO", project.id, Some(parent.id)).await;
    seed_case(&pool, "Valid password", parent.id, None, admin.id).await;
    seed_case(&pool, "SAML redirect", child.id, None, admin.id).await;

    let report = deletion_service()
        .delete(&pool, EntityKind::TestSuite, parent.id, &actor(&admin))
        .await
        .expect("Suite deletion should succeed");

    assert_eq!(report.deleted_count(EntityKind::TestSuite), 1);
    assert_eq!(report.deleted_count(EntityKind::TestCase), 1);
    assert_eq!(
        count_rows(&pool, "test_suites", &format!("id = {} AND parent_suite_id IS NULL", child.id))
            .await,
        1
    );
    assert_eq!(count_rows(&pool, "test_cases", "1=1").await, 1);
}

/// (6) Deleting a requirement unlinks its test cases instead of deleting them.
#[actix_rt::test]
async fn test_requirement_delete_unlinks_cases() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let project = seed_project(&pool, "Alpha", manager.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let req = seed_requirement(&pool, "Users can sign in", project.id, manager.id).await;
    let case = seed_case(&pool, "Valid password", suite.id, Some(req.id), manager.id).await;

    let report = deletion_service()
        .delete(&pool, EntityKind::Requirement, req.id, &actor(&manager))
        .await
        .expect("Requirement deletion should succeed");

    assert_eq!(report.deleted_count(EntityKind::Requirement), 1);
    assert_eq!(report.deleted_count(EntityKind::TestCase), 0);
    assert_eq!(
        count_rows(&pool, "test_cases", &format!("id = {} AND requirement_id IS NULL", case.id))
            .await,
        1
    );
}
