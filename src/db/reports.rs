//! Aggregate count queries backing the reporting service.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QuerySelect, RelationTrait,
};

use crate::entity::{bug, requirement, test_case, test_execution, user};
use crate::error::{AppError, AppResult};
use crate::models::{ExecutionStatus, Role};

/// Which executions and cases a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    /// Executions whose test case belongs to the project.
    Project(i32),
}

/// Execution counts bucketed by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
    pub skipped: u64,
}

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    key: String,
    count: i64,
}

pub async fn count_test_cases<C: ConnectionTrait>(db: &C, scope: ReportScope) -> AppResult<u64> {
    let mut select = test_case::Entity::find();
    if let ReportScope::Project(project_id) = scope {
        select = select.filter(test_case::Column::ProjectId.eq(project_id));
    }

    select
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))
}

/// Count executions per status within the scope.
pub async fn execution_counts<C: ConnectionTrait>(
    db: &C,
    scope: ReportScope,
) -> AppResult<ExecutionCounts> {
    let mut select = test_execution::Entity::find()
        .select_only()
        .column_as(test_execution::Column::Status, "key")
        .column_as(
            Expr::expr(Func::count(Expr::col((
                test_execution::Entity,
                test_execution::Column::Id,
            )))),
            "count",
        )
        .group_by(test_execution::Column::Status);

    if let ReportScope::Project(project_id) = scope {
        select = select
            .join(JoinType::InnerJoin, test_execution::Relation::TestCase.def())
            .filter(test_case::Column::ProjectId.eq(project_id));
    }

    let rows = select
        .into_model::<GroupCount>()
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count executions: {}", e)))?;

    let mut counts = ExecutionCounts::default();
    for row in rows {
        let n = row.count.max(0) as u64;
        counts.total += n;
        match ExecutionStatus::parse(&row.key) {
            Some(ExecutionStatus::Pass) => counts.passed += n,
            Some(ExecutionStatus::Fail) => counts.failed += n,
            Some(ExecutionStatus::Blocked) => counts.blocked += n,
            Some(ExecutionStatus::Skipped) => counts.skipped += n,
            None => {}
        }
    }

    Ok(counts)
}

/// Bugs filed against test cases in the scope.
pub async fn count_bugs<C: ConnectionTrait>(db: &C, scope: ReportScope) -> AppResult<u64> {
    let mut select = bug::Entity::find();
    if let ReportScope::Project(project_id) = scope {
        select = select
            .join(JoinType::InnerJoin, bug::Relation::TestCase.def())
            .filter(test_case::Column::ProjectId.eq(project_id));
    }

    select
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count bugs: {}", e)))
}

pub async fn count_requirements<C: ConnectionTrait>(
    db: &C,
    scope: ReportScope,
) -> AppResult<u64> {
    let mut select = requirement::Entity::find();
    if let ReportScope::Project(project_id) = scope {
        select = select.filter(requirement::Column::ProjectId.eq(project_id));
    }

    select
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count requirements: {}", e)))
}

/// User totals: (total, active, per role in `Role::ALL` order).
pub async fn user_counts<C: ConnectionTrait>(db: &C) -> AppResult<(u64, u64, [u64; 4])> {
    let total = user::Entity::find()
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count users: {}", e)))?;

    let active = user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count active users: {}", e)))?;

    let rows = user::Entity::find()
        .select_only()
        .column_as(user::Column::Role, "key")
        .column_as(
            Expr::expr(Func::count(Expr::col((user::Entity, user::Column::Id)))),
            "count",
        )
        .group_by(user::Column::Role)
        .into_model::<GroupCount>()
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count users by role: {}", e)))?;

    let mut per_role = [0u64; 4];
    for row in rows {
        if let Some(role) = Role::parse(&row.key) {
            let slot = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
            per_role[slot] += row.count.max(0) as u64;
        }
    }

    Ok((total, active, per_role))
}
