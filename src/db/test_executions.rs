//! Database operations for test executions.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entity::test_case;
use crate::entity::test_execution::{self, ActiveModel, Entity as TestExecution};
use crate::error::{AppError, AppResult};
use crate::models::{ExecuteTestCaseRequest, ExecutionQuery};

/// Default page size for execution listings.
pub const DEFAULT_LIMIT: u64 = 100;

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<test_execution::Model> {
    TestExecution::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test execution: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Test execution {}", id)))
}

/// List executions newest first. A project filter joins through the test case.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ExecutionQuery,
) -> AppResult<Vec<test_execution::Model>> {
    let mut select = TestExecution::find();

    if let Some(test_case_id) = query.test_case_id {
        select = select.filter(test_execution::Column::TestCaseId.eq(test_case_id));
    }
    if let Some(executed_by) = query.executed_by {
        select = select.filter(test_execution::Column::ExecutedBy.eq(executed_by));
    }
    if let Some(project_id) = query.project_id {
        select = select
            .join(JoinType::InnerJoin, test_execution::Relation::TestCase.def())
            .filter(test_case::Column::ProjectId.eq(project_id));
    }

    let executions = select
        .order_by_desc(test_execution::Column::ExecutionDate)
        .order_by_desc(test_execution::Column::Id)
        .limit(query.limit.unwrap_or(DEFAULT_LIMIT))
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list test executions: {}", e)))?;

    Ok(executions)
}

/// Record an execution of `test_case_id` by `executed_by`.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    test_case_id: i32,
    executed_by: i32,
    req: &ExecuteTestCaseRequest,
) -> AppResult<test_execution::Model> {
    let model = ActiveModel {
        test_case_id: Set(test_case_id),
        executed_by: Set(Some(executed_by)),
        status: Set(req.status.as_str().to_string()),
        actual_result: Set(req.actual_result.clone()),
        comments: Set(req.comments.clone()),
        environment: Set(req.environment.clone()),
        build_version: Set(req.build_version.clone()),
        execution_minutes: Set(req.execution_minutes),
        execution_date: Set(Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}
