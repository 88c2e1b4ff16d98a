//! Database operations for requirements, including test case linking.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::requirement::{self, ActiveModel, Entity as Requirement};
use crate::entity::test_case::{self, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::test_case::DEFAULT_PRIORITY;
use crate::models::{
    CreateRequirementRequest, EntityKind, RequirementQuery, UpdateRequirementRequest,
};

use super::ensure_exists;

const DEFAULT_REQUIREMENT_TYPE: &str = "Functional";
const DEFAULT_REQUIREMENT_STATUS: &str = "Draft";

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<requirement::Model> {
    Requirement::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get requirement: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Requirement {}", id)))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &RequirementQuery,
) -> AppResult<Vec<requirement::Model>> {
    let mut select = Requirement::find();

    if let Some(project_id) = query.project_id {
        select = select.filter(requirement::Column::ProjectId.eq(project_id));
    }

    let requirements = select
        .order_by_desc(requirement::Column::CreatedAt)
        .order_by_desc(requirement::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list requirements: {}", e)))?;

    Ok(requirements)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: &CreateRequirementRequest,
    created_by: i32,
) -> AppResult<requirement::Model> {
    ensure_exists(db, EntityKind::Project, req.project_id).await?;

    let model = ActiveModel {
        title: Set(req.title.clone()),
        description: Set(req.description.clone()),
        requirement_type: Set(req
            .requirement_type
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIREMENT_TYPE.to_string())),
        priority: Set(req
            .priority
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        status: Set(req
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIREMENT_STATUS.to_string())),
        project_id: Set(Some(req.project_id)),
        created_by: Set(Some(created_by)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    req: &UpdateRequirementRequest,
) -> AppResult<requirement::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(ref title) = req.title {
        active.title = Set(title.clone());
    }
    if let Some(ref description) = req.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(ref requirement_type) = req.requirement_type {
        active.requirement_type = Set(requirement_type.clone());
    }
    if let Some(ref priority) = req.priority {
        active.priority = Set(priority.clone());
    }
    if let Some(ref status) = req.status {
        active.status = Set(status.clone());
    }

    Ok(active.update(db).await?)
}

/// Test cases currently linked to a requirement.
pub async fn linked_test_cases<C: ConnectionTrait>(
    db: &C,
    requirement_id: i32,
) -> AppResult<Vec<test_case::Model>> {
    let cases = TestCase::find()
        .filter(test_case::Column::RequirementId.eq(requirement_id))
        .order_by_asc(test_case::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list linked test cases: {}", e)))?;

    Ok(cases)
}

/// Replace the requirement's links: unlink every case, then link `test_case_ids`.
///
/// Only cases in the requirement's project are linked; returns how many were.
pub async fn link_test_cases<C: ConnectionTrait>(
    db: &C,
    requirement_id: i32,
    test_case_ids: &[i32],
) -> AppResult<u64> {
    let requirement = get(db, requirement_id).await?;

    TestCase::update_many()
        .col_expr(
            test_case::Column::RequirementId,
            Expr::value(Option::<i32>::None),
        )
        .filter(test_case::Column::RequirementId.eq(requirement_id))
        .exec(db)
        .await?;

    if test_case_ids.is_empty() {
        return Ok(0);
    }

    let mut link = TestCase::update_many()
        .col_expr(test_case::Column::RequirementId, Expr::value(requirement_id))
        .col_expr(test_case::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(test_case::Column::Id.is_in(test_case_ids.iter().copied()));

    if let Some(project_id) = requirement.project_id {
        link = link.filter(test_case::Column::ProjectId.eq(project_id));
    }

    let result = link.exec(db).await?;
    Ok(result.rows_affected)
}
