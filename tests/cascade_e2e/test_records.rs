//! E2E tests: Record-keeping services around the deletion engine.

use testledger_lib::db;
use testledger_lib::error::AppError;
use testledger_lib::models::{CreateUserRequest, ExecutionStatus, NotificationQuery, Role};
use testledger_lib::services::{assignments, executions, reporting, user_admin};

use super::test_helpers::*;

/// (1) A failed run with `create_bug` files a bug against the test case.
#[actix_rt::test]
async fn test_failed_execution_files_bug() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;

    let mut req = execute_request(ExecutionStatus::Fail);
    req.actual_result = Some("Spinner never stops".to_string());
    req.create_bug = true;
    req.bug_severity = Some("High".to_string());

    let (execution, bug) = executions::execute_test_case(&pool, case.id, &actor(&tester), &req)
        .await
        .expect("Execution should be recorded");

    assert_eq!(execution.status, ExecutionStatus::Fail.as_str());
    assert_eq!(execution.executed_by, Some(tester.id));
    let bug = bug.expect("A bug should be filed");
    assert_eq!(bug.title, "Bug from test case: Valid password");
    assert_eq!(bug.description.as_deref(), Some("Spinner never stops"));
    assert_eq!(bug.severity, "High");
    assert_eq!(bug.test_case_id, Some(case.id));
    assert_eq!(bug.reported_by, Some(tester.id));

    // A passing run never files a bug.
    let mut pass = execute_request(ExecutionStatus::Pass);
    pass.create_bug = true;
    let (_, none) = executions::execute_test_case(&pool, case.id, &actor(&tester), &pass)
        .await
        .expect("Execution should be recorded");
    assert!(none.is_none());
    assert_eq!(count_rows(&pool, "bugs", "1=1").await, 1);
}

/// (2) Executing a missing test case records nothing.
#[actix_rt::test]
async fn test_execution_of_missing_case_is_not_found() {
    let pool = create_test_pool().await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;

    let result = executions::execute_test_case(
        &pool,
        42,
        &actor(&tester),
        &execute_request(ExecutionStatus::Pass),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(count_rows(&pool, "test_executions", "1=1").await, 0);
}

/// (3) Creating an assignment notifies the assignee and inherits the project.
#[actix_rt::test]
async fn test_assignment_notifies_assignee() {
    let pool = create_test_pool().await;
    let manager = seed_user(&pool, "mia", Role::Manager).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;
    let project = seed_project(&pool, "Alpha", manager.id).await;
    let suite = seed_suite(&pool, "Login", project.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, manager.id).await;

    let mut req = assignment_request("Run login suite", tester.id);
    req.test_case_id = Some(case.id);

    let assignment = assignments::create_assignment(&pool, &actor(&manager), &req)
        .await
        .expect("Assignment should be created");
    assert_eq!(assignment.project_id, Some(project.id));
    assert_eq!(assignment.assigned_by, Some(manager.id));
    assert_eq!(assignment.created_by, Some(manager.id));

    let notifications =
        db::notifications::list_for_user(pool.connection(), tester.id, &NotificationQuery::default())
            .await
            .expect("list notifications");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, assignments::NOTIFICATION_TITLE);
    assert_eq!(
        notifications[0].message.as_deref(),
        Some("You have been assigned: Run login suite")
    );

    // Testers cannot assign work.
    let by_tester = assignments::create_assignment(&pool, &actor(&tester), &req).await;
    assert!(matches!(by_tester, Err(AppError::Forbidden(_))));
}

/// (4) At most one admin account exists.
#[actix_rt::test]
async fn test_single_admin_is_enforced() {
    let pool = create_test_pool().await;
    let admin = user_admin::bootstrap_admin(&pool, "root", "root@testledger.local", "$2b$12$x")
        .await
        .expect("First admin should be created");

    let second =
        user_admin::bootstrap_admin(&pool, "root2", "root2@testledger.local", "$2b$12$x").await;
    assert!(
        matches!(&second, Err(AppError::Conflict(msg)) if msg == user_admin::ADMIN_EXISTS_MSG),
        "Second admin should conflict: {:?}",
        second.map(|u| u.id)
    );

    let manager_req = CreateUserRequest {
        username: "mia".to_string(),
        email: "mia@testledger.local".to_string(),
        password_hash: "$2b$12$x".to_string(),
        role: Role::Manager,
        department: Some("QA".to_string()),
    };
    let manager = user_admin::create_user(&pool, &actor(&admin), &manager_req)
        .await
        .expect("Admin can create a manager");

    let duplicate = user_admin::create_user(&pool, &actor(&admin), &manager_req).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let by_manager = user_admin::create_user(&pool, &actor(&manager), &manager_req).await;
    assert!(matches!(by_manager, Err(AppError::Forbidden(_))));
}

/// (5) Nobody deactivates themselves or the admin.
#[actix_rt::test]
async fn test_toggle_active_guards() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let tester = seed_user(&pool, "tina", Role::Tester).await;

    let own = user_admin::toggle_active(&pool, &actor(&admin), admin.id).await;
    assert!(matches!(own, Err(AppError::Forbidden(_))));

    let toggled = user_admin::toggle_active(&pool, &actor(&admin), tester.id)
        .await
        .expect("Admin can deactivate a tester");
    assert!(!toggled.is_active);

    let back = user_admin::toggle_active(&pool, &actor(&admin), tester.id)
        .await
        .expect("Admin can reactivate a tester");
    assert!(back.is_active);
}

/// (6) Pass rates are rounded to two decimals and scoped per project.
#[actix_rt::test]
async fn test_reporting_pass_rate() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    let alpha = seed_project(&pool, "Alpha", admin.id).await;
    let suite = seed_suite(&pool, "Login", alpha.id, None).await;
    let case = seed_case(&pool, "Valid password", suite.id, None, admin.id).await;
    for status in [
        ExecutionStatus::Pass,
        ExecutionStatus::Pass,
        ExecutionStatus::Pass,
        ExecutionStatus::Fail,
    ] {
        seed_execution(&pool, case.id, admin.id, status).await;
    }

    let beta = seed_project(&pool, "Beta", admin.id).await;
    let beta_suite = seed_suite(&pool, "Checkout", beta.id, None).await;
    let beta_case = seed_case(&pool, "Pay by card", beta_suite.id, None, admin.id).await;
    seed_execution(&pool, beta_case.id, admin.id, ExecutionStatus::Blocked).await;

    let alpha_report = reporting::project_report(&pool, alpha.id)
        .await
        .expect("project report");
    assert_eq!(alpha_report.total_executions, 4);
    assert_eq!(alpha_report.passed, 3);
    assert_eq!(alpha_report.failed, 1);
    assert_eq!(alpha_report.pass_rate, 75.0);

    let summary = reporting::summary(&pool).await.expect("summary");
    assert_eq!(summary.total_test_cases, 2);
    assert_eq!(summary.total_executions, 5);
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.pass_rate, 60.0);

    let missing = reporting::project_report(&pool, 9999).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

/// (7) A duplicate username on an admin request is not reported as a second admin.
#[actix_rt::test]
async fn test_admin_request_with_taken_username() {
    let pool = create_test_pool().await;
    seed_user(&pool, "root", Role::Tester).await;

    let result =
        user_admin::bootstrap_admin(&pool, "root", "other@testledger.local", "$2b$12$x").await;
    match result {
        Err(AppError::Conflict(msg)) => {
            assert_eq!(msg, "Username or email already exists");
        }
        other => panic!("Expected a username conflict, got {:?}", other.map(|u| u.id)),
    }
    assert_eq!(count_rows(&pool, "users", "role = 'admin'").await, 0);
}

/// (8) User statistics count by role and activity.
#[actix_rt::test]
async fn test_user_stats_by_role() {
    let pool = create_test_pool().await;
    let admin = seed_user(&pool, "admin", Role::Admin).await;
    seed_user(&pool, "mia", Role::Manager).await;
    seed_user(&pool, "tina", Role::Tester).await;
    let tom = seed_user(&pool, "tom", Role::Tester).await;
    user_admin::toggle_active(&pool, &actor(&admin), tom.id)
        .await
        .expect("Admin can deactivate a tester");

    let stats = reporting::user_stats(&pool).await.expect("user stats");
    assert_eq!(stats.total_users, 4);
    assert_eq!(stats.active_users, 3);
    assert_eq!(stats.admin_count, 1);
    assert_eq!(stats.manager_count, 1);
    assert_eq!(stats.developer_count, 0);
    assert_eq!(stats.tester_count, 2);
}
