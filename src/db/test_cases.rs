//! Database operations for test cases.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::test_case::{
    DEFAULT_AUTOMATION_STATUS, DEFAULT_CASE_STATUS, DEFAULT_CASE_TYPE, DEFAULT_PRIORITY,
};
use crate::models::{CreateTestCaseRequest, EntityKind, TestCaseQuery, UpdateTestCaseRequest};

use super::{ensure_exists, test_suites};

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<test_case::Model> {
    TestCase::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &TestCaseQuery,
) -> AppResult<Vec<test_case::Model>> {
    let mut select = TestCase::find();

    if let Some(project_id) = query.project_id {
        select = select.filter(test_case::Column::ProjectId.eq(project_id));
    }
    if let Some(suite_id) = query.test_suite_id {
        select = select.filter(test_case::Column::TestSuiteId.eq(suite_id));
    }
    if let Some(requirement_id) = query.requirement_id {
        select = select.filter(test_case::Column::RequirementId.eq(requirement_id));
    }
    if let Some(assigned_to) = query.assigned_to {
        select = select.filter(test_case::Column::AssignedTo.eq(assigned_to));
    }

    let cases = select
        .order_by_desc(test_case::Column::CreatedAt)
        .order_by_desc(test_case::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))?;

    Ok(cases)
}

/// Insert a test case after checking every referenced parent exists.
///
/// When only a suite is given the project is taken from the suite; when both
/// are given they must agree.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: &CreateTestCaseRequest,
    created_by: i32,
) -> AppResult<test_case::Model> {
    if req.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Test case title is required".to_string()));
    }

    let mut project_id = req.project_id;
    if let Some(suite_id) = req.test_suite_id {
        let suite = test_suites::get(db, suite_id).await?;
        match (project_id, suite.project_id) {
            (None, from_suite) => project_id = from_suite,
            (Some(given), Some(from_suite)) if given != from_suite => {
                return Err(AppError::InvalidInput(format!(
                    "Test suite {} belongs to project {}, not {}",
                    suite_id, from_suite, given
                )));
            }
            _ => {}
        }
    }

    if let Some(project_id) = project_id {
        ensure_exists(db, EntityKind::Project, project_id).await?;
    }
    if let Some(requirement_id) = req.requirement_id {
        ensure_exists(db, EntityKind::Requirement, requirement_id).await?;
    }
    if let Some(assignee) = req.assigned_to {
        ensure_exists(db, EntityKind::User, assignee).await?;
    }

    let now = Utc::now();
    let model = ActiveModel {
        title: Set(req.title.clone()),
        description: Set(req.description.clone()),
        preconditions: Set(req.preconditions.clone()),
        test_steps: Set(req.test_steps.clone()),
        expected_result: Set(req.expected_result.clone()),
        test_data: Set(req.test_data.clone()),
        priority: Set(or_default(&req.priority, DEFAULT_PRIORITY)),
        status: Set(or_default(&req.status, DEFAULT_CASE_STATUS)),
        case_type: Set(or_default(&req.case_type, DEFAULT_CASE_TYPE)),
        automation_status: Set(or_default(&req.automation_status, DEFAULT_AUTOMATION_STATUS)),
        estimated_minutes: Set(req.estimated_minutes),
        project_id: Set(project_id),
        test_suite_id: Set(req.test_suite_id),
        requirement_id: Set(req.requirement_id),
        created_by: Set(Some(created_by)),
        assigned_to: Set(req.assigned_to),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    req: &UpdateTestCaseRequest,
) -> AppResult<test_case::Model> {
    let existing = get(db, id).await?;

    if let Some(suite_id) = req.test_suite_id {
        ensure_exists(db, EntityKind::TestSuite, suite_id).await?;
    }
    if let Some(requirement_id) = req.requirement_id {
        ensure_exists(db, EntityKind::Requirement, requirement_id).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(ref title) = req.title {
        active.title = Set(title.clone());
    }
    if let Some(ref v) = req.description {
        active.description = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.preconditions {
        active.preconditions = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.test_steps {
        active.test_steps = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.expected_result {
        active.expected_result = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.test_data {
        active.test_data = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.priority {
        active.priority = Set(v.clone());
    }
    if let Some(ref v) = req.status {
        active.status = Set(v.clone());
    }
    if let Some(ref v) = req.case_type {
        active.case_type = Set(v.clone());
    }
    if let Some(ref v) = req.automation_status {
        active.automation_status = Set(v.clone());
    }
    if req.estimated_minutes.is_some() {
        active.estimated_minutes = Set(req.estimated_minutes);
    }
    if req.test_suite_id.is_some() {
        active.test_suite_id = Set(req.test_suite_id);
    }
    if req.requirement_id.is_some() {
        active.requirement_id = Set(req.requirement_id);
    }
    if req.assigned_to.is_some() {
        active.assigned_to = Set(req.assigned_to);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Copy a test case as "Copy of <title>", owned by `created_by`.
pub async fn duplicate<C: ConnectionTrait>(
    db: &C,
    id: i32,
    created_by: i32,
) -> AppResult<test_case::Model> {
    let source = get(db, id).await?;
    let now = Utc::now();

    let copy = ActiveModel {
        title: Set(format!("Copy of {}", source.title)),
        description: Set(source.description),
        preconditions: Set(source.preconditions),
        test_steps: Set(source.test_steps),
        expected_result: Set(source.expected_result),
        test_data: Set(source.test_data),
        priority: Set(source.priority),
        status: Set(source.status),
        case_type: Set(source.case_type),
        automation_status: Set(source.automation_status),
        estimated_minutes: Set(source.estimated_minutes),
        project_id: Set(source.project_id),
        test_suite_id: Set(source.test_suite_id),
        requirement_id: Set(source.requirement_id),
        created_by: Set(Some(created_by)),
        assigned_to: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(copy.insert(db).await?)
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}
