//! E2E tests: Databases on an older schema.

use testledger_lib::db::SchemaCatalog;
use testledger_lib::migration::{Migrator, MigratorTrait};
use testledger_lib::models::{EntityKind, ExecutionStatus, Role};
use testledger_lib::services::cascade::StepAction;

use super::test_helpers::*;

/// Schema as it was before assignments gained a project column and before
/// comments and notifications existed.
async fn create_legacy_pool() -> testledger_lib::db::DbPool {
    let pool = create_empty_pool().await;
    Migrator::up(pool.connection(), Some(7))
        .await
        .expect("Failed to run early migrations");
    exec(
        &pool,
        "CREATE TABLE assignments (\
            id INTEGER PRIMARY KEY AUTOINCREMENT, \
            title TEXT NOT NULL, \
            assigned_to INTEGER REFERENCES users(id), \
            test_case_id INTEGER REFERENCES test_cases(id))",
    )
    .await;
    pool
}

/// (1) Steps on missing tables or columns are skipped, the rest still run.
#[actix_rt::test]
async fn test_project_delete_on_legacy_schema() {
    let pool = create_legacy_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;
    seed_execution(&pool, case.id, tester.id, ExecutionStatus::Pass).await;
    seed_bug(&pool, "Lockout message missing", case.id, tester.id).await;
    exec(
        &pool,
        &format!(
            "INSERT INTO assignments (title, assigned_to, test_case_id) VALUES ('Run login', {}, {})",
            tester.id, case.id
        ),
    )
    .await;

    let report = deletion_service()
        .delete_project(&pool, project.id, &actor(&admin))
        .await
        .expect("Deletion should succeed on a legacy schema");

    assert_eq!(report.failures().count(), 0, "No step should fail: {:?}", report.steps);
    assert!(report.skipped().any(|s| s.action == StepAction::Collect
        && s.table == "assignments"
        && s.column.as_deref() == Some("project_id")));
    assert!(report.skipped().any(|s| s.table == "comments"));

    assert_eq!(report.deleted_count(EntityKind::Assignment), 1);
    assert_eq!(report.deleted_count(EntityKind::TestCase), 1);
    assert_eq!(count_rows(&pool, "assignments", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "bugs", "1=1").await, 0);
    assert_eq!(count_rows(&pool, "projects", "1=1").await, 0);
}

/// (2) User deletion skips the notification and comment steps.
#[actix_rt::test]
async fn test_user_delete_on_legacy_schema() {
    let pool = create_legacy_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    exec(
        &pool,
        &format!("INSERT INTO assignments (title, assigned_to) VALUES ('Triage', {})", tester.id),
    )
    .await;

    let report = deletion_service()
        .delete_user(&pool, tester.id, &actor(&admin))
        .await
        .expect("Deletion should succeed on a legacy schema");

    assert_eq!(report.failures().count(), 0, "No step should fail: {:?}", report.steps);
    assert!(report.skipped().any(|s| s.table == "notifications"));
    assert!(report.skipped().any(|s| s.table == "assignments"
        && s.column.as_deref() == Some("created_by")));
    assert_eq!(report.deleted_count(EntityKind::Assignment), 1);
    assert_eq!(count_rows(&pool, "users", "1=1").await, 1);
}

/// (3) Legacy alias columns on test cases are folded into the canonical ones.
#[actix_rt::test]
async fn test_alias_columns_are_collapsed() {
    let pool = create_empty_pool().await;
    Migrator::up(pool.connection(), Some(10))
        .await
        .expect("Failed to run migrations before the alias fold");
    exec(&pool, "ALTER TABLE test_cases ADD COLUMN suite_id INTEGER").await;
    exec(&pool, "ALTER TABLE test_cases ADD COLUMN steps TEXT").await;

    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    exec(
        &pool,
        &format!(
            "INSERT INTO test_cases (title, project_id, suite_id, steps, created_at, updated_at) \
             VALUES ('Legacy case', {}, {}, 'Open the login page', \
             '2025-03-01 00:00:00', '2025-03-01 00:00:00')",
            project.id, suite.id
        ),
    )
    .await;

    Migrator::up(pool.connection(), None)
        .await
        .expect("Failed to run the alias fold");

    assert_eq!(
        count_rows(
            &pool,
            "test_cases",
            &format!("test_suite_id = {} AND test_steps = 'Open the login page'", suite.id)
        )
        .await,
        1
    );

    let catalog = SchemaCatalog::load(pool.connection())
        .await
        .expect("catalog");
    assert!(catalog.has_column("test_cases", "test_suite_id"));
    assert!(!catalog.has_column("test_cases", "suite_id"));
    assert!(!catalog.has_column("test_cases", "steps"));
}
