//! E2E tests: Bulk deletion.

use testledger_lib::models::{EntityKind, ExecutionStatus, Role};
use testledger_lib::services::cascade::{CascadeEngine, DependencyGraph, REFERENCES};
use testledger_lib::services::{DeletionError, DeletionService};

use super::test_helpers::*;

/// (1) Missing ids are reported; the rest are deleted; duplicates count once.
#[actix_rt::test]
async fn test_bulk_delete_reports_missing_ids() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let alpha = seed_project(&pool, "Alpha", manager.id).await;
    let beta = seed_project(&pool, "Beta", manager.id).await;
    let gamma = seed_project(&pool, "Gamma", manager.id).await;
    seed_suite(&pool, "Login", alpha.id, None).await;

    let summary = deletion_service()
        .bulk_delete(
            &pool,
            EntityKind::Project,
            &[alpha.id, 9999, beta.id, alpha.id],
            &actor(&manager),
        )
        .await
        .expect("Bulk deletion should run");

    assert_eq!(summary.deleted_count, 2);
    assert_eq!(summary.errors, vec!["Project 9999 not found".to_string()]);
    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "projects", &format!("id = {}", gamma.id)).await, 1);
    assert_eq!(count_rows(&pool, "test_suites", "1=1").await, 0);
}

/// (2) Error messages are capped; failures past the cap are still counted out.
#[actix_rt::test]
async fn test_bulk_errors_are_capped() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(seed_execution(&pool, case.id, admin.id, ExecutionStatus::Pass).await.id);
    }
    let own = seed_execution(&pool, case.id, tester.id, ExecutionStatus::Blocked).await;
    ids.push(own.id);

    let summary = deletion_service()
        .bulk_delete(&pool, EntityKind::TestExecution, &ids, &actor(&tester))
        .await
        .expect("Bulk deletion should run");

    assert_eq!(summary.deleted_count, 1);
    assert_eq!(summary.errors.len(), TEST_BULK_ERROR_LIMIT);
    assert!(summary.errors.iter().all(|e| e.starts_with("Access denied")));
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 5);
}

/// (3) Batch-wide checks reject the request before anything is deleted.
#[actix_rt::test]
async fn test_bulk_role_and_input_checks() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", tester.id).await;
    let service = deletion_service();

    let empty = service
        .bulk_delete(&pool, EntityKind::Project, &[], &actor(&admin))
        .await;
    assert!(matches!(empty, Err(DeletionError::InvalidInput(_))));

    // Owning the project is not enough for the bulk variant.
    let by_tester = service
        .bulk_delete(&pool, EntityKind::Project, &[project.id], &actor(&tester))
        .await;
    assert!(matches!(by_tester, Err(DeletionError::AccessDenied(_))));

    let with_self = service
        .bulk_delete(&pool, EntityKind::User, &[tester.id, admin.id], &actor(&admin))
        .await;
    assert!(matches!(with_self, Err(DeletionError::SelfDeletion)));

    // Self-deletion is reported ahead of the role check.
    let tester_self = service
        .bulk_delete(&pool, EntityKind::User, &[tester.id], &actor(&tester))
        .await;
    assert!(matches!(tester_self, Err(DeletionError::SelfDeletion)));

    assert_eq!(count_rows(&pool, "projects", "1=1").await, 1);
    assert_eq!(count_rows(&pool, "users", "1=1").await, 2);
}

/// (4) A root failure rolls back only that id.
#[actix_rt::test]
async fn test_bulk_root_failure_is_isolated() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let blocked = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", blocked.id, None).await;
    seed_case(&pool, "Valid password", suite.id, None, admin.id).await;
    let free = seed_project(&pool, "Beta", admin.id).await;

    let references = REFERENCES
        .iter()
        .copied()
        .filter(|r| !(r.from == EntityKind::TestSuite && r.column == "project_id"))
        .collect();
    let graph = DependencyGraph::new(references).expect("graph without suite edge is acyclic");
    let service = DeletionService::new(CascadeEngine::new(graph), TEST_BULK_ERROR_LIMIT);

    let summary = service
        .bulk_delete(&pool, EntityKind::Project, &[blocked.id, free.id], &actor(&admin))
        .await
        .expect("Bulk deletion should run");

    assert_eq!(summary.deleted_count, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with(&format!("Project {}:", blocked.id)));
    assert_eq!(count_rows(&pool, "projects", &format!("id = {}", blocked.id)).await, 1);
    assert_eq!(count_rows(&pool, "projects", &format!("id = {}", free.id)).await, 0);
    // The failed id's dependents were restored with its savepoint.
    assert_eq!(count_rows(&pool, "test_cases", "1=1").await, 1);
}
