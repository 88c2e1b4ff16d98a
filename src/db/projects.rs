//! Database operations for projects.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::error::{AppError, AppResult};
use crate::models::project::DEFAULT_PROJECT_STATUS;
use crate::models::{CreateProjectRequest, ProjectQuery, UpdateProjectRequest};

/// Get a project by ID.
pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<project::Model> {
    Project::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
}

/// List projects, newest first.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ProjectQuery,
) -> AppResult<Vec<project::Model>> {
    let mut select = Project::find();

    if let Some(ref status) = query.status {
        select = select.filter(project::Column::Status.eq(status.as_str()));
    }

    let projects = select
        .order_by_desc(project::Column::CreatedAt)
        .order_by_desc(project::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

    Ok(projects)
}

/// Insert a new project owned by `created_by`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    req: &CreateProjectRequest,
    created_by: i32,
) -> AppResult<project::Model> {
    if req.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Project name is required".to_string()));
    }

    let now = Utc::now();
    let model = ActiveModel {
        name: Set(req.name.clone()),
        description: Set(req.description.clone()),
        status: Set(req
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string())),
        start_date: Set(req.start_date),
        end_date: Set(req.end_date),
        created_by: Set(Some(created_by)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Apply the present fields of an update request.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    req: &UpdateProjectRequest,
) -> AppResult<project::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(ref name) = req.name {
        active.name = Set(name.clone());
    }
    if let Some(ref description) = req.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(ref status) = req.status {
        active.status = Set(status.clone());
    }
    if req.start_date.is_some() {
        active.start_date = Set(req.start_date);
    }
    if req.end_date.is_some() {
        active.end_date = Set(req.end_date);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}
