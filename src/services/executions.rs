//! Test execution workflow.

use sea_orm::TransactionTrait;
use tracing::info;

use crate::db::{self, DbPool};
use crate::entity::{bug, test_execution};
use crate::error::AppResult;
use crate::models::{Actor, CreateBugRequest, ExecuteTestCaseRequest, ExecutionStatus};

/// Title given to bugs filed from a failed run.
pub fn bug_title(test_case_title: &str) -> String {
    format!("Bug from test case: {}", test_case_title)
}

/// Record a run of a test case by the actor.
///
/// A failed run with `create_bug` set also files a bug against the test case,
/// in the same transaction as the execution.
pub async fn execute_test_case(
    pool: &DbPool,
    test_case_id: i32,
    actor: &Actor,
    req: &ExecuteTestCaseRequest,
) -> AppResult<(test_execution::Model, Option<bug::Model>)> {
    let txn = pool.connection().begin().await?;

    let test_case = db::test_cases::get(&txn, test_case_id).await?;
    let execution = db::test_executions::insert(&txn, test_case_id, actor.id, req).await?;

    let bug = if req.status == ExecutionStatus::Fail && req.create_bug {
        let bug_req = CreateBugRequest {
            title: bug_title(&test_case.title),
            description: req.actual_result.clone(),
            severity: req.bug_severity.clone(),
            environment: req.environment.clone(),
            build_version: req.build_version.clone(),
            expected_result: test_case.expected_result.clone(),
            actual_result: req.actual_result.clone(),
            test_case_id: Some(test_case_id),
            ..Default::default()
        };
        Some(db::bugs::create(&txn, &bug_req, actor.id).await?)
    } else {
        None
    };

    txn.commit().await?;

    info!(
        test_case_id,
        execution_id = execution.id,
        status = %req.status,
        bug_id = ?bug.as_ref().map(|b| b.id),
        "Test execution recorded"
    );

    Ok((execution, bug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bug_title() {
        assert_eq!(bug_title("Login works"), "Bug from test case: Login works");
    }
}
