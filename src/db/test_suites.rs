//! Database operations for test suites.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::test_suite::{self, ActiveModel, Entity as TestSuite};
use crate::error::{AppError, AppResult};
use crate::models::{CreateTestSuiteRequest, EntityKind, TestSuiteQuery, UpdateTestSuiteRequest};

use super::ensure_exists;

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<test_suite::Model> {
    TestSuite::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test suite: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Test suite {}", id)))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &TestSuiteQuery,
) -> AppResult<Vec<test_suite::Model>> {
    let mut select = TestSuite::find();

    if let Some(project_id) = query.project_id {
        select = select.filter(test_suite::Column::ProjectId.eq(project_id));
    }

    let suites = select
        .order_by_asc(test_suite::Column::Name)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list test suites: {}", e)))?;

    Ok(suites)
}

/// Insert a suite after checking that its project (and parent, if any) exist.
///
/// A parent suite must belong to the same project.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: &CreateTestSuiteRequest,
) -> AppResult<test_suite::Model> {
    ensure_exists(db, EntityKind::Project, req.project_id).await?;

    if let Some(parent_id) = req.parent_suite_id {
        let parent = get(db, parent_id).await?;
        if parent.project_id != Some(req.project_id) {
            return Err(AppError::InvalidInput(format!(
                "Parent suite {} belongs to a different project",
                parent_id
            )));
        }
    }

    let model = ActiveModel {
        name: Set(req.name.clone()),
        description: Set(req.description.clone()),
        project_id: Set(Some(req.project_id)),
        parent_suite_id: Set(req.parent_suite_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    req: &UpdateTestSuiteRequest,
) -> AppResult<test_suite::Model> {
    let existing = get(db, id).await?;

    if let Some(parent_id) = req.parent_suite_id {
        if parent_id == id {
            return Err(AppError::InvalidInput(
                "A suite cannot be its own parent".to_string(),
            ));
        }
        ensure_exists(db, EntityKind::TestSuite, parent_id).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(ref name) = req.name {
        active.name = Set(name.clone());
    }
    if let Some(ref description) = req.description {
        active.description = Set(Some(description.clone()));
    }
    if req.parent_suite_id.is_some() {
        active.parent_suite_id = Set(req.parent_suite_id);
    }

    Ok(active.update(db).await?)
}
