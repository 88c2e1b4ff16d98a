//! Database operations for bugs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::bug::{self, ActiveModel, Entity as Bug};
use crate::error::{AppError, AppResult};
use crate::models::bug::{DEFAULT_BUG_STATUS, DEFAULT_BUG_TYPE};
use crate::models::test_case::DEFAULT_PRIORITY;
use crate::models::{BugQuery, CreateBugRequest, EntityKind, UpdateBugRequest};

use super::ensure_exists;

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bug::Model> {
    Bug::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get bug: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Bug {}", id)))
}

pub async fn list<C: ConnectionTrait>(db: &C, query: &BugQuery) -> AppResult<Vec<bug::Model>> {
    let mut select = Bug::find();

    if let Some(test_case_id) = query.test_case_id {
        select = select.filter(bug::Column::TestCaseId.eq(test_case_id));
    }
    if let Some(ref status) = query.status {
        select = select.filter(bug::Column::Status.eq(status.as_str()));
    }

    let bugs = select
        .order_by_desc(bug::Column::CreatedAt)
        .order_by_desc(bug::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list bugs: {}", e)))?;

    Ok(bugs)
}

/// Insert a bug reported by `reported_by`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: &CreateBugRequest,
    reported_by: i32,
) -> AppResult<bug::Model> {
    if req.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Bug title is required".to_string()));
    }
    if let Some(test_case_id) = req.test_case_id {
        ensure_exists(db, EntityKind::TestCase, test_case_id).await?;
    }
    if let Some(assignee) = req.assigned_to {
        ensure_exists(db, EntityKind::User, assignee).await?;
    }

    let now = Utc::now();
    let model = ActiveModel {
        title: Set(req.title.clone()),
        description: Set(req.description.clone()),
        severity: Set(req
            .severity
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        priority: Set(req
            .priority
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        status: Set(DEFAULT_BUG_STATUS.to_string()),
        bug_type: Set(req
            .bug_type
            .clone()
            .unwrap_or_else(|| DEFAULT_BUG_TYPE.to_string())),
        environment: Set(req.environment.clone()),
        build_version: Set(req.build_version.clone()),
        steps_to_reproduce: Set(req.steps_to_reproduce.clone()),
        expected_result: Set(req.expected_result.clone()),
        actual_result: Set(req.actual_result.clone()),
        test_case_id: Set(req.test_case_id),
        reported_by: Set(Some(reported_by)),
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
    req: &UpdateBugRequest,
) -> AppResult<bug::Model> {
    let existing = get(db, id).await?;

    if let Some(assignee) = req.assigned_to {
        ensure_exists(db, EntityKind::User, assignee).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(ref v) = req.title {
        active.title = Set(v.clone());
    }
    if let Some(ref v) = req.description {
        active.description = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.severity {
        active.severity = Set(v.clone());
    }
    if let Some(ref v) = req.priority {
        active.priority = Set(v.clone());
    }
    if let Some(ref v) = req.status {
        active.status = Set(v.clone());
    }
    if let Some(ref v) = req.bug_type {
        active.bug_type = Set(v.clone());
    }
    if let Some(ref v) = req.environment {
        active.environment = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.build_version {
        active.build_version = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.steps_to_reproduce {
        active.steps_to_reproduce = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.expected_result {
        active.expected_result = Set(Some(v.clone()));
    }
    if let Some(ref v) = req.actual_result {
        active.actual_result = Set(Some(v.clone()));
    }
    if req.assigned_to.is_some() {
        active.assigned_to = Set(req.assigned_to);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Change only the status.
pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: &str,
) -> AppResult<bug::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}
