//! Database operations for assignments.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::assignment::{self, ActiveModel, Entity as Assignment};
use crate::error::{AppError, AppResult};
use crate::models::test_case::DEFAULT_PRIORITY;
use crate::models::{
    AssignmentQuery, AssignmentStatus, CreateAssignmentRequest, UpdateAssignmentRequest,
};

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<assignment::Model> {
    Assignment::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get assignment: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {}", id)))
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &AssignmentQuery,
) -> AppResult<Vec<assignment::Model>> {
    let mut select = Assignment::find();

    if let Some(assigned_to) = query.assigned_to {
        select = select.filter(assignment::Column::AssignedTo.eq(assigned_to));
    }
    if let Some(ref status) = query.status {
        select = select.filter(assignment::Column::Status.eq(status.as_str()));
    }

    let assignments = select
        .order_by_desc(assignment::Column::CreatedAt)
        .order_by_desc(assignment::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list assignments: {}", e)))?;

    Ok(assignments)
}

/// Insert an assignment. Parents are resolved by the caller.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    req: &CreateAssignmentRequest,
    project_id: Option<i32>,
    assigned_by: i32,
) -> AppResult<assignment::Model> {
    let now = Utc::now();
    let model = ActiveModel {
        title: Set(req.title.clone()),
        description: Set(req.description.clone()),
        assignment_type: Set(req.assignment_type.clone()),
        assigned_to: Set(Some(req.assigned_to)),
        assigned_by: Set(Some(assigned_by)),
        created_by: Set(Some(assigned_by)),
        due_date: Set(req.due_date),
        status: Set(AssignmentStatus::Assigned.as_str().to_string()),
        priority: Set(req
            .priority
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
        project_id: Set(project_id),
        test_case_id: Set(req.test_case_id),
        bug_id: Set(req.bug_id),
        notes: Set(req.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    req: &UpdateAssignmentRequest,
) -> AppResult<assignment::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(ref v) = req.title {
        active.title = Set(v.clone());
    }
    if let Some(ref v) = req.description {
        active.description = Set(Some(v.clone()));
    }
    if let Some(status) = req.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(ref v) = req.priority {
        active.priority = Set(v.clone());
    }
    if req.due_date.is_some() {
        active.due_date = Set(req.due_date);
    }
    if let Some(ref v) = req.notes {
        active.notes = Set(Some(v.clone()));
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Mark an assignment completed.
pub async fn complete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<assignment::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(AssignmentStatus::Completed.as_str().to_string());
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}
