//! Database operations for users.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, Role, UpdateUserRequest};

/// Find a user by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<user::Model>> {
    let result = User::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))?;

    Ok(result)
}

/// Get a user by ID or fail with `NotFound`.
pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<user::Model> {
    find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

/// List all users ordered by username.
pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<user::Model>> {
    let users = User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

    Ok(users)
}

/// The admin account, if one exists.
pub async fn find_admin<C: ConnectionTrait>(db: &C) -> AppResult<Option<user::Model>> {
    let admin = User::find()
        .filter(user::Column::Role.eq(Role::Admin.as_str()))
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up admin: {}", e)))?;

    Ok(admin)
}

/// Insert a user row. Uniqueness violations surface as `Conflict`.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    req: &CreateUserRequest,
) -> AppResult<user::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        username: Set(req.username.clone()),
        email: Set(req.email.clone()),
        password_hash: Set(req.password_hash.clone()),
        role: Set(req.role.as_str().to_string()),
        is_active: Set(true),
        department: Set(req.department.clone()),
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
    req: &UpdateUserRequest,
) -> AppResult<user::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(ref email) = req.email {
        active.email = Set(email.clone());
    }
    if let Some(role) = req.role {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(ref department) = req.department {
        active.department = Set(Some(department.clone()));
    }
    if let Some(ref password_hash) = req.password_hash {
        active.password_hash = Set(password_hash.clone());
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Set the active flag.
pub async fn set_active<C: ConnectionTrait>(
    db: &C,
    id: i32,
    is_active: bool,
) -> AppResult<user::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}
